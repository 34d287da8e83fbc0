//! Student profile persistence.
//!
//! A single TOML file holds the last-used roll number so the student side
//! can prefill it across runs. The file is read once at startup and written
//! whenever a roll number is confirmed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Persisted student profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Last roll number the student announced.
    #[serde(default)]
    pub roll_number: Option<String>,
}

/// Profile store backed by a TOML file on disk.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Open a store at the given path. The file need not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the platform-default store location.
    pub fn open_default() -> Self {
        Self::open(default_profile_path())
    }

    /// The path this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the profile, or the default when the file does not exist.
    pub fn load(&self) -> Result<Profile> {
        if !self.path.exists() {
            debug!("No profile at {}, using defaults", self.path.display());
            return Ok(Profile::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| Error::Read {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Save the profile, creating parent directories as needed.
    pub fn save(&self, profile: &Profile) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(profile)?;
        fs::write(&self.path, content).map_err(|e| Error::Write {
            path: self.path.clone(),
            source: e,
        })?;

        info!("Saved profile to {}", self.path.display());
        Ok(())
    }

    /// Remember the last-used roll number.
    pub fn remember_roll_number(&self, roll_number: &str) -> Result<()> {
        let mut profile = self.load()?;
        profile.roll_number = Some(roll_number.to_string());
        self.save(&profile)
    }

    /// Forget the stored roll number. No-op when nothing is stored.
    pub fn forget_roll_number(&self) -> Result<()> {
        let mut profile = self.load()?;
        if profile.roll_number.take().is_some() {
            self.save(&profile)?;
        }
        Ok(())
    }
}

/// Default profile path following platform conventions.
///
/// - Linux: `~/.local/share/rollcall/profile.toml`
/// - macOS: `~/Library/Application Support/rollcall/profile.toml`
/// - Windows: `C:\Users\<user>\AppData\Local\rollcall\profile.toml`
pub fn default_profile_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rollcall")
        .join("profile.toml")
}
