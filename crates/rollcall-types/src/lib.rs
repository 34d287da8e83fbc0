//! Platform-agnostic types for the rollcall attendance helper.
//!
//! This crate provides the shared vocabulary used by the BLE scanning side
//! (`rollcall-core`) and any front end:
//!
//! - Roll numbers and roster entries
//! - The label-matching rules for extracting roll numbers from device names
//! - UUID constants for the attendance GATT service
//! - Error types for roll-number decoding
//!
//! # Example
//!
//! ```
//! use rollcall_types::{RollNumber, matcher};
//!
//! let roll = matcher::extract(Some("RollNo_1001"));
//! assert_eq!(roll, Some(RollNumber::new("1001")));
//! ```

pub mod error;
pub mod matcher;
pub mod types;
pub mod uuid;

pub use error::{ParseError, ParseResult};
pub use types::{AttendanceStatus, RollNumber, RosterEntry};
pub use uuid as uuids;
