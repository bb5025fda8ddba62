//! State file persistence.

use crate::SyncState;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the default state file.
pub const STATE_FILE_NAME: &str = "state.json";

/// Errors that can occur during state management operations.
#[derive(Error, Debug)]
pub enum StateError {
    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to delete a file.
    #[error("Failed to delete file '{path}': {source}")]
    DeleteFile {
        /// The path that could not be deleted.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse JSON.
    #[error("Failed to parse state file '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to serialize JSON.
    #[error("Failed to serialize state: {0}")]
    SerializeJson(#[from] serde_json::Error),
}

/// Result type for state operations.
pub type Result<T> = std::result::Result<T, StateError>;

/// Reads and writes the sync state file.
#[derive(Debug, Clone)]
pub struct StateManager {
    path: PathBuf,
}

impl StateManager {
    /// Creates a state manager for the file at `path`.
    ///
    /// Nothing is touched on disk until the state is saved.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default path of the state file.
    ///
    /// Uses the `directories` crate to find the appropriate location:
    /// - Linux: `~/.local/share/ratetap/state.json`
    /// - macOS: `~/Library/Application Support/ratetap/state.json`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\ratetap\state.json`
    ///
    /// Falls back to `~/.ratetap/state.json` if the platform-specific
    /// location cannot be determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "ratetap")
            .map_or_else(dirs_fallback, |proj_dirs| proj_dirs.data_dir().to_path_buf())
            .join(STATE_FILE_NAME)
    }

    /// Creates a state manager for the default path.
    #[must_use]
    pub fn with_default_path() -> Self {
        Self::new(Self::default_path())
    }

    /// Returns the path of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the state, or an empty state if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<SyncState> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no state file, starting fresh");
            return Ok(SyncState::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| StateError::ReadFile {
            path: self.path.clone(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(SyncState::default());
        }

        serde_json::from_str(&content).map_err(|e| StateError::ParseJson {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Saves the state.
    ///
    /// The file is written next to its destination and renamed into place,
    /// so an interrupted save leaves the previous state intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized or written to disk.
    pub fn save(&self, state: &SyncState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty())
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StateError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(state)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, json).map_err(|e| StateError::WriteFile {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StateError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %self.path.display(), "state saved");
        Ok(())
    }

    /// Deletes the state file.
    ///
    /// Returns false if there was nothing to delete.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be deleted.
    pub fn reset(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        fs::remove_file(&self.path).map_err(|e| StateError::DeleteFile {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(true)
    }
}

/// Fallback for determining home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".ratetap")
}
