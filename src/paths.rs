//! Path resolution for ssnctl
//!
//! # Environment Variables
//!
//! - `SPOTINST_CREDENTIALS_PATH` - Override the credentials file location
//!
//! # Path Resolution Priority
//!
//! For credentials_path():
//! 1. Explicit path (command line flag, then manifest)
//! 2. `SPOTINST_CREDENTIALS_PATH` environment variable
//! 3. `~/.spotinst/credentials`

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::PathBuf;

/// Environment variable for credentials file override
pub const ENV_CREDENTIALS_PATH: &str = "SPOTINST_CREDENTIALS_PATH";

/// Get the credentials file path
pub fn credentials_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        let path = expand(path);
        log::debug!("Using explicit credentials path: {}", path.display());
        return Ok(path);
    }

    if let Ok(path) = std::env::var(ENV_CREDENTIALS_PATH) {
        let path = expand(&path);
        log::debug!(
            "Using credentials path from {}: {}",
            ENV_CREDENTIALS_PATH,
            path.display()
        );
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".spotinst").join("credentials");
    log::debug!("Using default credentials path: {}", path.display());
    Ok(path)
}

/// Expand ~ and environment variables in a path string.
///
/// Unresolvable variables leave the input unchanged.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}
