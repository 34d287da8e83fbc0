//! Local profile persistence for the rollcall attendance helper.
//!
//! This crate stores the one piece of state that survives a restart: the
//! student's last-used roll number, kept in a small TOML file under the
//! platform data directory.
//!
//! # Example
//!
//! ```no_run
//! use rollcall_store::ProfileStore;
//!
//! let store = ProfileStore::open_default();
//! store.remember_roll_number("CS2023001")?;
//!
//! let profile = store.load()?;
//! assert_eq!(profile.roll_number.as_deref(), Some("CS2023001"));
//! # Ok::<(), rollcall_store::Error>(())
//! ```

mod error;
mod profile;

pub use error::{Error, Result};
pub use profile::{Profile, ProfileStore, default_profile_path};
