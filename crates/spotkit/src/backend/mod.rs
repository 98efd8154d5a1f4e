//! Backend abstraction for stateful node operations.
//!
//! The [`Backend`] trait defines the calls the client needs, allowing for
//! different implementations (HTTP, in-memory mock for testing).
//!
//! # Testing
//!
//! Use [`MockBackend`] for testing without network access:
//!
//! ```
//! use spotkit::backend::{Backend, MockBackend};
//! use spotkit::NodeRecord;
//!
//! let mock = MockBackend::new();
//! mock.add_node(NodeRecord::new("ssn-1", "n1"));
//!
//! let nodes = mock.list_nodes().unwrap();
//! assert_eq!(nodes.len(), 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::{NodeRecord, NodeState};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Backend trait for stateful node operations.
///
/// Documents are passed as JSON trees in the API's camelCase form.
pub trait Backend: Send + Sync {
    /// List every stateful node in the account.
    fn list_nodes(&self) -> Result<Vec<NodeRecord>>;

    /// Create a node, returning the created record.
    fn create_node(&self, node: &Value) -> Result<NodeRecord>;

    /// Update a node, returning the updated record.
    fn update_node(&self, id: &str, node: &Value) -> Result<NodeRecord>;

    /// Delete a node, optionally deallocating its resources.
    fn delete_node(&self, id: &str, deallocation: Option<&Value>) -> Result<()>;

    /// Run a state transition.
    fn update_node_state(&self, id: &str, state: NodeState) -> Result<()>;
}

/// A request seen by [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockRequest {
    /// `list_nodes`
    List,
    /// `create_node` with its body
    Create(Value),
    /// `update_node` with id and body
    Update(String, Value),
    /// `delete_node` with id and deallocation body
    Delete(String, Option<Value>),
    /// `update_node_state`
    State(String, NodeState),
}

#[derive(Debug, Default)]
struct MockState {
    nodes: Vec<NodeRecord>,
    requests: Vec<MockRequest>,
    next_id: usize,
    failure: Option<(u16, String)>,
}

/// In-memory backend for testing without network access.
///
/// Nodes live in a shared list; create, update and delete act on it the way
/// the API would, and every request is recorded.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing node.
    pub fn add_node(&self, node: NodeRecord) {
        self.lock().nodes.push(node);
    }

    /// Make every following call fail with this API response.
    pub fn fail_with(&self, status: u16, body: impl Into<String>) {
        self.lock().failure = Some((status, body.into()));
    }

    /// Requests seen so far.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.lock().requests.clone()
    }

    /// Nodes currently stored.
    pub fn nodes(&self) -> Vec<NodeRecord> {
        self.lock().nodes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a request and return the configured failure, if any.
    fn begin(&self, request: MockRequest) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.requests.push(request);
        if let Some((status, body)) = &state.failure {
            return Err(Error::from_api_response(*status, body));
        }
        Ok(state)
    }
}

fn not_found(id: &str) -> Error {
    Error::from_api_response(
        400,
        &format!(
            r#"{{"response":{{"errors":[{{"code":"STATEFUL_NODE_DOES_NOT_EXIST","message":"Stateful node {id} does not exist"}}]}}}}"#
        ),
    )
}

fn record_from(id: String, node: &Value) -> NodeRecord {
    let name = node
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    NodeRecord::new(id, name)
}

impl Backend for MockBackend {
    fn list_nodes(&self) -> Result<Vec<NodeRecord>> {
        let state = self.begin(MockRequest::List)?;
        Ok(state.nodes.clone())
    }

    fn create_node(&self, node: &Value) -> Result<NodeRecord> {
        let mut state = self.begin(MockRequest::Create(node.clone()))?;
        state.next_id += 1;
        let record = record_from(format!("ssn-mock{}", state.next_id), node);
        state.nodes.push(record.clone());
        Ok(record)
    }

    fn update_node(&self, id: &str, node: &Value) -> Result<NodeRecord> {
        let mut state = self.begin(MockRequest::Update(id.to_string(), node.clone()))?;
        let existing = state
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| not_found(id))?;
        if let Some(name) = node.get("name").and_then(Value::as_str) {
            existing.name = name.to_string();
        }
        Ok(existing.clone())
    }

    fn delete_node(&self, id: &str, deallocation: Option<&Value>) -> Result<()> {
        let mut state =
            self.begin(MockRequest::Delete(id.to_string(), deallocation.cloned()))?;
        let before = state.nodes.len();
        state.nodes.retain(|n| n.id != id);
        if state.nodes.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    fn update_node_state(&self, id: &str, node_state: NodeState) -> Result<()> {
        let state = self.begin(MockRequest::State(id.to_string(), node_state))?;
        if state.nodes.iter().any(|n| n.id == id) {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}
