//! Core types for reconciliation

use crate::error::{Error, Result};
use crate::path::FieldPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The single mutating operation an invocation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State transition chained after a successful update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Pause,
    Resume,
    Recycle,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Recycle => "recycle",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "recycle" => Ok(Self::Recycle),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

/// How an existing resource is identified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniquenessBy {
    /// Only an explicit id identifies the resource
    Id,
    /// The desired name is looked up among existing resources
    #[default]
    Name,
}

impl FromStr for UniquenessBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            other => Err(Error::UnknownUniqueness(other.to_string())),
        }
    }
}

/// Whether the resource should exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    #[default]
    Present,
    Absent,
}

impl FromStr for Presence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(Error::UnknownState(other.to_string())),
        }
    }
}

/// Existing resource as returned by the lookup-all call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: String,
    pub name: String,
}

impl RemoteRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Which operation runs, and against which id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub operation: Operation,
    pub id: Option<String>,
}

impl Resolution {
    pub fn create() -> Self {
        Self {
            operation: Operation::Create,
            id: None,
        }
    }

    pub fn update(id: impl Into<String>) -> Self {
        Self {
            operation: Operation::Update,
            id: Some(id.into()),
        }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Self {
            operation: Operation::Delete,
            id: Some(id.into()),
        }
    }
}

/// Everything one invocation needs from its caller
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Desired state tree (the contents of the root field)
    pub desired_state: Value,
    /// Deallocation tree used by delete
    pub deallocation: Option<Value>,
    /// Explicit id of an existing resource
    pub explicit_id: Option<String>,
    pub uniqueness_by: UniquenessBy,
    pub state: Presence,
    /// Paths pruned from the desired state before an update
    pub exclusions: Vec<FieldPath>,
    /// Transition to run after a successful update
    pub action: Option<Action>,
}

impl Request {
    pub fn new(desired_state: Value) -> Self {
        Self {
            desired_state,
            ..Default::default()
        }
    }

    /// Name in the desired state, if any
    pub fn desired_name(&self) -> Option<&str> {
        self.desired_state.get("name").and_then(Value::as_str)
    }
}

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub operation: Operation,
    pub changed: bool,
    pub resource_id: Option<String>,
    pub message: String,
}

/// Documents an invocation would send, without sending them
#[derive(Debug, Clone, Serialize)]
pub struct Plan<D, X> {
    pub resolution: Resolution,
    /// Request document for create/update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<D>,
    /// Deallocation document for delete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deallocation: Option<X>,
    /// Transition that would follow the update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}
