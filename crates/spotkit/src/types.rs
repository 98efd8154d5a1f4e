//! Core types for the Spot API client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.spotinst.io";

/// Resource path of Azure stateful nodes.
pub const STATEFUL_NODE_PATH: &str = "/azure/compute/statefulNode";

/// Token and account used to authenticate requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer token.
    pub token: String,
    /// Account id, sent as the `accountId` query parameter.
    pub account: Option<String>,
}

impl Credentials {
    /// Create credentials for the default account of a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            account: None,
        }
    }

    /// Target a specific account.
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }
}

// Keep the token out of logs and panic messages
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("account", &self.account)
            .finish()
    }
}

/// A stateful node as returned by the API.
///
/// Only the identity fields are typed; everything else is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Node id (`ssn-...`).
    pub id: String,
    /// Node name.
    #[serde(default)]
    pub name: String,
    /// Azure region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Remaining fields of the node.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl NodeRecord {
    /// Create a record with only identity fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            region: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// State transitions accepted by `PUT /{id}/state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// Stop the VM, keeping its persisted resources.
    Pause,
    /// Start a paused node.
    Resume,
    /// Replace the VM.
    Recycle,
}

impl NodeState {
    /// Wire name of the transition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Recycle => "recycle",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Wire envelopes
// =============================================================================

/// `{"response": {"items": [...]}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ItemsEnvelope<T> {
    pub response: ItemsBody<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemsBody<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Body of create and update requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NodeBody<'a> {
    pub stateful_node: &'a Value,
}

/// Body of delete requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteBody<'a> {
    pub deallocation_config: &'a Value,
}

/// Body of state transition requests.
#[derive(Debug, Serialize)]
pub(crate) struct StateBody {
    pub state: NodeState,
}
