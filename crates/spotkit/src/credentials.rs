//! Credentials file parsing
//!
//! The file holds one `key: value` (or `key = value`) pair per line:
//!
//! ```text
//! # ~/.spotinst/credentials
//! token: 1234abcd
//! account: act-12345678
//! ```

use crate::error::{Error, Result};
use std::io;
use std::path::Path;

/// Values read from a credentials file; either may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsFile {
    /// `token` entry
    pub token: Option<String>,
    /// `account` entry
    pub account: Option<String>,
}

impl CredentialsFile {
    /// Parse file contents. Unknown keys are ignored.
    pub fn parse(content: &str) -> Self {
        let mut file = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = split_pair(line) else {
                log::debug!("ignoring credentials line without separator");
                continue;
            };

            let value = value.trim().trim_matches('"').to_string();
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "token" => file.token = Some(value),
                "account" => file.account = Some(value),
                _ => {}
            }
        }

        file
    }

    /// Load a credentials file; a missing file yields empty credentials
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("loaded credentials from {}", path.display());
                Ok(Self::parse(&content))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no credentials file at {}", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }
}

/// Split on whichever of `:` or `=` comes first
fn split_pair(line: &str) -> Option<(&str, &str)> {
    let index = line.find([':', '='])?;
    Some((&line[..index], &line[index + 1..]))
}
