//! Unified path management for solace configuration and data.
//!
//! All session documents and configuration live under the platform config
//! directory so every binary resolves the same locations.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for solace.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/solace/            # Config directory
/// └── sessions/                # Session documents (DirSessionStore)
///     └── <session-id>.toml
/// ```
pub struct SolacePaths;

impl SolacePaths {
    /// Returns the solace configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/solace/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("solace"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the sessions directory.
    pub fn sessions_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("sessions"))
    }
}
