//! Error types for roll-number decoding in rollcall-types.

use thiserror::Error;

/// Errors that can occur when decoding a roll number from device data.
///
/// This error type is platform-agnostic and does not include BLE-specific
/// errors (those belong in rollcall-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Characteristic bytes were not valid UTF-8.
    #[error("Invalid roll number: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The decoded roll number was empty.
    #[error("Invalid roll number: empty string")]
    Empty,
}

/// Result type alias using rollcall-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
