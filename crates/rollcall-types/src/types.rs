//! Core types for attendance records.

use core::fmt;

use time::OffsetDateTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A student roll number.
///
/// Uniqueness is defined by exact string equality; no internal structure is
/// assumed beyond "printable token". Roll numbers are produced either by the
/// label matcher ([`crate::matcher::extract`]) or by decoding the roll-number
/// characteristic of a connected device ([`RollNumber::from_utf8`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RollNumber(String);

impl RollNumber {
    /// Create a roll number from an already-validated token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Decode a roll number from raw characteristic bytes.
    ///
    /// Student devices store the roll number as a UTF-8 string. An empty
    /// value is rejected so a blank characteristic never lands in a roster.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_types::RollNumber;
    ///
    /// let roll = RollNumber::from_utf8(b"CS2023001".to_vec()).unwrap();
    /// assert_eq!(roll.as_str(), "CS2023001");
    /// assert!(RollNumber::from_utf8(Vec::new()).is_err());
    /// ```
    pub fn from_utf8(bytes: Vec<u8>) -> Result<Self, ParseError> {
        let token =
            String::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8(e.utf8_error()))?;
        if token.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self(token))
    }

    /// The roll number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the roll number, returning the underlying string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RollNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RollNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RollNumber {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for RollNumber {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Attendance state recorded for a roster entry.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new states
/// (e.g. late arrival) in future versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum AttendanceStatus {
    /// The student's device was detected during the scanning session.
    Present,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
        }
    }
}

/// One recorded attendance entry.
///
/// Created on the first successful match of a roll number during a scanning
/// session and never updated afterwards. Entries are removed only when the
/// whole roster is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RosterEntry {
    /// The extracted roll number.
    pub roll_number: RollNumber,
    /// The device label (or identifier) the roll number came from.
    pub raw_label: String,
    /// When the device was recorded.
    pub recorded_at: OffsetDateTime,
    /// Attendance state.
    pub status: AttendanceStatus,
}

impl RosterEntry {
    /// Create a `Present` entry recorded at the given time.
    pub fn present(
        roll_number: RollNumber,
        raw_label: impl Into<String>,
        recorded_at: OffsetDateTime,
    ) -> Self {
        Self {
            roll_number,
            raw_label: raw_label.into(),
            recorded_at,
            status: AttendanceStatus::Present,
        }
    }
}
