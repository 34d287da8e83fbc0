//! Error types for rollcall-core.
//!
//! Two outcomes of a discovery interaction are deliberately *not* errors:
//! an interaction that surfaces no device (`Ok(None)` from
//! [`crate::traits::DiscoveryService::request_device`]) and a roll number
//! that is already on the roster ([`crate::roster::RecordOutcome::Duplicate`]).
//! Both are normal and the scanning loop continues through them silently.
//! Everything else lands here and is logged without halting the loop.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while discovering and reading student devices.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Bluetooth Low Energy error.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// No Bluetooth adapter available on this host.
    #[error("no Bluetooth adapter available")]
    AdapterUnavailable,

    /// The device had no usable label and the characteristic fallback
    /// failed too.
    #[error("no usable roll number from device {identifier}")]
    NoLabel {
        /// Identifier of the device that could not be resolved.
        identifier: String,
        /// The failure that ended the fallback.
        #[source]
        source: Box<Error>,
    },

    /// Connection failed with specific reason.
    #[error("Connection failed: {reason}")]
    ConnectionFailed {
        /// The device identifier that failed to connect.
        identifier: Option<String>,
        /// The structured reason for the failure.
        reason: ConnectionFailureReason,
    },

    /// Required BLE characteristic not found on device.
    #[error("Characteristic not found: {uuid} (searched {service_count} services)")]
    CharacteristicNotFound {
        /// The UUID that was not found.
        uuid: String,
        /// Number of services that were searched.
        service_count: usize,
    },

    /// A roll number read from a device could not be decoded.
    #[error(transparent)]
    InvalidRollNumber(#[from] rollcall_types::ParseError),

    /// Operation timed out.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// Operation was cancelled.
    #[error("Operation cancelled")]
    Cancelled,
}

/// Structured reasons for connection failures.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new reasons
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConnectionFailureReason {
    /// Device is out of range.
    OutOfRange,
    /// Device rejected the connection.
    Rejected,
    /// Connection attempt timed out.
    Timeout,
    /// Generic BLE error.
    BleError(String),
    /// Other/unknown error.
    Other(String),
}

impl std::fmt::Display for ConnectionFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "device out of range"),
            Self::Rejected => write!(f, "connection rejected by device"),
            Self::Timeout => write!(f, "connection timed out"),
            Self::BleError(msg) => write!(f, "BLE error: {}", msg),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error {
    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a characteristic not found error.
    pub fn characteristic_not_found(uuid: impl Into<String>, service_count: usize) -> Self {
        Self::CharacteristicNotFound {
            uuid: uuid.into(),
            service_count,
        }
    }

    /// Create a connection failure with structured reason.
    pub fn connection_failed(identifier: Option<String>, reason: ConnectionFailureReason) -> Self {
        Self::ConnectionFailed { identifier, reason }
    }

    /// Create a connection failure with a string reason.
    ///
    /// This is a convenience method that wraps the string in
    /// `ConnectionFailureReason::Other`.
    pub fn connection_failed_str(identifier: Option<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            identifier,
            reason: ConnectionFailureReason::Other(reason.into()),
        }
    }

    /// Create a no-label error for a device whose fallback failed.
    pub fn no_label(identifier: impl Into<String>, source: Error) -> Self {
        Self::NoLabel {
            identifier: identifier.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias using rollcall-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
