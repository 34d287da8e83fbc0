//! Core BLE scanning library for the rollcall attendance helper.
//!
//! This crate drives the teacher side of rollcall: it repeatedly performs
//! Bluetooth Low Energy discovery interactions, extracts student roll
//! numbers from the devices it surfaces, and records them into a
//! deduplicated, insertion-ordered attendance roster.
//!
//! # Features
//!
//! - **Scanning session**: a cancellable, fixed-cadence discovery loop with
//!   an Idle/Scanning state machine
//! - **Roll-number extraction**: advertised-name matching with a GATT
//!   characteristic fallback for nameless devices
//! - **Attendance roster**: idempotent, insertion-ordered recording
//! - **Events**: broadcast notifications for state transitions and new
//!   entries
//! - **Testing seam**: a [`DiscoveryService`] trait with a scripted mock
//! - **Student stub**: an announcer that publishes the device name a
//!   student's phone should carry
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use rollcall_core::{BleDiscovery, DiscoveryOptions, ScanSession, SessionOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let discovery = BleDiscovery::new(DiscoveryOptions::default()).await?;
//!     let session = ScanSession::new(Arc::new(discovery), SessionOptions::default());
//!
//!     session.start().await;
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     session.stop().await;
//!
//!     for entry in session.snapshot().await {
//!         println!("{} present (seen as {})", entry.roll_number, entry.raw_label);
//!     }
//!     Ok(())
//! }
//! ```

pub mod announce;
pub mod device;
pub mod error;
pub mod events;
pub mod mock;
pub mod roster;
pub mod scan;
pub mod session;
pub mod traits;

// Core exports
pub use announce::Announcer;
pub use device::{BleConnection, BleDiscovery};
pub use error::{ConnectionFailureReason, Error, Result};
pub use events::{EventDispatcher, EventReceiver, EventSender, RosterEvent};
pub use mock::{MockDiscovery, MockOutcome};
pub use roster::{AttendanceRoster, RecordOutcome};
pub use scan::{DeviceCandidate, DiscoveryOptions};
pub use session::{ScanSession, SessionOptions};
pub use traits::DiscoveryService;

// Re-export shared types for convenience.
pub use rollcall_types::uuid as uuids;
pub use rollcall_types::{AttendanceStatus, RollNumber, RosterEntry, matcher};
