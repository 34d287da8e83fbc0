//! Error types for rollcall-store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing the student profile.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Failed to create the profile directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read the profile file.
    #[error("Failed to read profile {path}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the profile file.
    #[error("Failed to write profile {path}: {source}")]
    Write {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The profile file is not valid TOML.
    #[error("Failed to parse profile: {0}")]
    Parse(#[from] toml::de::Error),

    /// The profile could not be serialized.
    #[error("Failed to serialize profile: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type alias using rollcall-store's Error type.
pub type Result<T> = std::result::Result<T, Error>;
