//! Student-side announcer.
//!
//! Peripheral-mode advertising is not available on the platforms this tool
//! targets, so announcing reduces to validating the roll number and
//! publishing the device name a student's phone should carry. Persisting
//! the roll number for the next run is wired by the caller (see
//! `rollcall-store`).

use tracing::{debug, info};

use rollcall_types::ParseError;

use crate::error::{Error, Result};

/// Advertised-name prefix the teacher-side matcher recognizes.
const ADVERTISED_PREFIX: &str = "RollNo_";

/// Student-side announcing stub.
///
/// Two states, Idle and Announcing. Starting validates the roll number and
/// records the advertised name; stopping is idempotent. There is no real
/// wireless broadcast behind either.
#[derive(Debug, Default)]
pub struct Announcer {
    advertised: Option<String>,
}

impl Announcer {
    /// Create an Idle announcer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin announcing the given roll number, returning the advertised
    /// name.
    ///
    /// Leading and trailing whitespace is trimmed; an empty roll number is
    /// rejected. Starting while already announcing replaces the previous
    /// name.
    pub fn start(&mut self, roll_number: &str) -> Result<String> {
        let roll_number = roll_number.trim();
        if roll_number.is_empty() {
            return Err(Error::InvalidRollNumber(ParseError::Empty));
        }

        let name = format!("{ADVERTISED_PREFIX}{roll_number}");
        self.advertised = Some(name.clone());
        info!("Announcing roll number {}", roll_number);
        Ok(name)
    }

    /// Stop announcing. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.advertised.take().is_some() {
            info!("Announcing stopped");
        } else {
            debug!("Announcer already idle");
        }
    }

    /// Whether the announcer is currently in the Announcing state.
    #[must_use]
    pub fn is_announcing(&self) -> bool {
        self.advertised.is_some()
    }

    /// The name a student device should currently advertise.
    #[must_use]
    pub fn advertised_name(&self) -> Option<&str> {
        self.advertised.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_publishes_the_advertised_name() {
        let mut announcer = Announcer::new();
        assert!(!announcer.is_announcing());

        let name = announcer.start("CS2023001").unwrap();
        assert_eq!(name, "RollNo_CS2023001");
        assert!(announcer.is_announcing());
        assert_eq!(announcer.advertised_name(), Some("RollNo_CS2023001"));
    }

    #[test]
    fn input_is_trimmed_and_empty_is_rejected() {
        let mut announcer = Announcer::new();

        let name = announcer.start("  1001  ").unwrap();
        assert_eq!(name, "RollNo_1001");

        let err = announcer.start("   ").unwrap_err();
        assert!(matches!(err, Error::InvalidRollNumber(_)));
    }

    #[test]
    fn restarting_replaces_the_previous_name() {
        let mut announcer = Announcer::new();
        announcer.start("1001").unwrap();
        announcer.start("1002").unwrap();
        assert_eq!(announcer.advertised_name(), Some("RollNo_1002"));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut announcer = Announcer::new();
        announcer.start("1001").unwrap();

        announcer.stop();
        assert!(!announcer.is_announcing());
        assert_eq!(announcer.advertised_name(), None);

        // A second stop is a no-op.
        announcer.stop();
        assert!(!announcer.is_announcing());
    }

    #[test]
    fn advertised_name_round_trips_through_the_matcher() {
        let mut announcer = Announcer::new();
        let name = announcer.start("1001").unwrap();

        let extracted = rollcall_types::matcher::extract(Some(&name)).unwrap();
        assert_eq!(extracted.as_str(), "1001");
    }
}
