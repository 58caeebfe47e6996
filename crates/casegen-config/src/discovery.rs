//! Config file discovery
//!
//! Searches upward from the current directory for `.casegen/config.toml`.
//! An explicit path skips discovery and must exist.

use std::path::{Path, PathBuf};

use crate::{Config, ConfigError};

/// Config file location relative to each candidate directory
pub const CONFIG_RELATIVE_PATH: &str = ".casegen/config.toml";

/// Load configuration.
///
/// With `explicit` set, that file is loaded and must exist. Otherwise the
/// filesystem is searched upward from the current directory; when no config
/// file is found, built-in defaults apply (an absent file is not an error).
///
/// # Errors
///
/// Returns `ConfigError` when an explicit path does not exist, or when any
/// located file cannot be read or parsed.
pub fn discover(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        return load_file(path);
    }

    let cwd = std::env::current_dir()?;
    match find_upward(&cwd) {
        Some(path) => load_file(&path),
        None => Ok(Config::default()),
    }
}

/// Parse a config file from disk.
///
/// # Errors
///
/// Returns `ConfigError::InvalidFile` when the file is not valid TOML, or
/// `ConfigError::Io` when it cannot be read.
pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|e| ConfigError::InvalidFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn find_upward(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(CONFIG_RELATIVE_PATH);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}
