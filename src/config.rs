//! Manifest loading and request assembly
//!
//! A manifest describes one stateful node and how to reconcile it. Command
//! line flags override manifest values; credentials fall back to the
//! environment and then to the credentials file.

use anyhow::{Context, Result, bail};
use declarative::{Action, Presence, Request, UniquenessBy};
use serde::Deserialize;
use serde_json::Value;
use spotkit::{Credentials, CredentialsFile};
use std::fs;
use std::path::Path;

/// Environment fallback for the account id
const ENV_ACCOUNT: &str = "ACCOUNT";

/// Fields the desired state must carry as strings
const REQUIRED_FIELDS: &[&str] = &["name", "region", "resource_group_name"];

// ============================================================================
// Manifest
// ============================================================================

/// On-disk manifest format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Toml,
}

impl ManifestFormat {
    /// Pick the format from the file extension; anything but `.json` is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uniqueness_by: Option<String>,
    /// Dotted paths left untouched on update
    #[serde(default)]
    pub do_not_update: Vec<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub credentials_path: Option<String>,
    #[serde(default)]
    pub stateful_node_config: Option<NodeConfig>,
    pub stateful_node: Value,
}

/// Settings that are not part of the node document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    #[serde(default)]
    pub deletion_config: Option<DeletionConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeletionConfig {
    #[serde(default)]
    pub deallocation_config: Option<Value>,
}

impl Manifest {
    /// Load and validate a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let manifest = Self::parse(&content, ManifestFormat::from_path(path))
            .with_context(|| format!("Invalid manifest {}", path.display()))?;
        log::debug!("Loaded manifest from {}", path.display());
        Ok(manifest)
    }

    /// Parse and validate manifest contents
    pub fn parse(content: &str, format: ManifestFormat) -> Result<Self> {
        let manifest: Self = match format {
            ManifestFormat::Json => serde_json::from_str(content)?,
            ManifestFormat::Toml => toml::from_str(content)?,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check the desired state carries the fields every request needs
    pub fn validate(&self) -> Result<()> {
        let Some(node) = self.stateful_node.as_object() else {
            bail!("stateful_node must be a table");
        };
        for field in REQUIRED_FIELDS {
            match node.get(*field) {
                Some(Value::String(_)) => {}
                Some(_) => bail!("stateful_node.{field} must be a string"),
                None => bail!("stateful_node.{field} is required"),
            }
        }
        Ok(())
    }

    /// Deallocation settings for delete, if configured
    pub fn deallocation(&self) -> Option<&Value> {
        self.stateful_node_config
            .as_ref()?
            .deletion_config
            .as_ref()?
            .deallocation_config
            .as_ref()
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Command line values that take precedence over the manifest
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub state: Option<String>,
    pub id: Option<String>,
    pub uniqueness_by: Option<String>,
    pub do_not_update: Vec<String>,
    pub action: Option<String>,
    pub token: Option<String>,
    pub account_id: Option<String>,
    pub credentials_path: Option<String>,
}

/// Assemble the reconciliation request from manifest and overrides
pub fn build_request(manifest: &Manifest, overrides: &Overrides) -> Result<Request> {
    let state = overrides
        .state
        .as_deref()
        .or(manifest.state.as_deref())
        .map(str::parse::<Presence>)
        .transpose()?
        .unwrap_or_default();

    let uniqueness_by = overrides
        .uniqueness_by
        .as_deref()
        .or(manifest.uniqueness_by.as_deref())
        .map(str::parse::<UniquenessBy>)
        .transpose()?
        .unwrap_or_default();

    let action = overrides
        .action
        .as_deref()
        .or(manifest.action.as_deref())
        .map(str::parse::<Action>)
        .transpose()?;

    let exclusions = if overrides.do_not_update.is_empty() {
        &manifest.do_not_update
    } else {
        &overrides.do_not_update
    };

    Ok(Request {
        desired_state: manifest.stateful_node.clone(),
        deallocation: manifest.deallocation().cloned(),
        explicit_id: overrides.id.clone().or_else(|| manifest.id.clone()),
        uniqueness_by,
        state,
        exclusions: declarative::parse_all(exclusions).context("Invalid do_not_update entry")?,
        action,
    })
}

/// Resolve API credentials: flag or env, then manifest, then credentials file
///
/// The account id additionally falls back to the `ACCOUNT` environment
/// variable before the credentials file.
pub fn resolve_credentials(
    manifest: &Manifest,
    overrides: &Overrides,
    file: CredentialsFile,
) -> Result<Credentials> {
    let token = overrides
        .token
        .clone()
        .or_else(|| manifest.token.clone())
        .or(file.token)
        .context("No API token: pass --token, set SPOTINST_TOKEN, or add 'token' to the credentials file")?;

    let account = overrides
        .account_id
        .clone()
        .or_else(|| manifest.account_id.clone())
        .or_else(|| std::env::var(ENV_ACCOUNT).ok())
        .or(file.account);

    if account.is_none() {
        log::debug!("No account id configured, using the token's default account");
    }

    let credentials = Credentials::new(token);
    Ok(match account {
        Some(account) => credentials.with_account(account),
        None => credentials,
    })
}

/// Credentials file path from overrides or manifest
pub fn credentials_path_hint<'a>(manifest: &'a Manifest, overrides: &'a Overrides) -> Option<&'a str> {
    overrides
        .credentials_path
        .as_deref()
        .or(manifest.credentials_path.as_deref())
}

// ============================================================================
// Tests
// ============================================================================
