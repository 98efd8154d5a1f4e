//! # spotkit
//!
//! Pure Rust client for the Spot stateful node API (Azure).
//!
//! This crate provides functionality for:
//! - Listing, creating, updating and deleting stateful nodes
//! - Pausing, resuming and recycling nodes
//! - Reading `~/.spotinst/credentials` style files
//!
//! ## Example
//!
//! ```no_run
//! use spotkit::{Client, Credentials, NodeState};
//! use serde_json::json;
//!
//! let client = Client::new(Credentials::new("token").with_account("act-123"));
//!
//! for node in client.list_nodes().expect("List failed") {
//!     println!("{} {}", node.id, node.name);
//! }
//!
//! let node = client
//!     .create_node(&json!({"name": "n1", "region": "eastus"}))
//!     .expect("Create failed");
//! client.update_node_state(&node.id, NodeState::Pause).expect("Pause failed");
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod credentials;
pub mod error;
pub mod types;

pub use credentials::CredentialsFile;
pub use error::{Error, ErrorCategory, Result};
pub use types::{Credentials, NodeRecord, NodeState};

use backend::{Backend, http::HttpBackend};
use serde::Serialize;

/// High-level client for stateful node operations.
///
/// The client wraps a backend and accepts any serializable document, so
/// callers can pass typed request structs directly.
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create a client against the public API.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            backend: Box::new(HttpBackend::new(credentials)),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// List every stateful node in the account.
    pub fn list_nodes(&self) -> Result<Vec<NodeRecord>> {
        self.backend.list_nodes()
    }

    /// Create a node.
    pub fn create_node<T: Serialize>(&self, node: &T) -> Result<NodeRecord> {
        self.backend.create_node(&serde_json::to_value(node)?)
    }

    /// Update a node.
    pub fn update_node<T: Serialize>(&self, id: &str, node: &T) -> Result<NodeRecord> {
        self.backend.update_node(id, &serde_json::to_value(node)?)
    }

    /// Delete a node, optionally deallocating its resources.
    pub fn delete_node<T: Serialize>(&self, id: &str, deallocation: Option<&T>) -> Result<()> {
        let deallocation = deallocation.map(serde_json::to_value).transpose()?;
        self.backend.delete_node(id, deallocation.as_ref())
    }

    /// Pause, resume or recycle a node.
    pub fn update_node_state(&self, id: &str, state: NodeState) -> Result<()> {
        self.backend.update_node_state(id, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::{MockBackend, MockRequest};
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Node {
        name: String,
        resource_group_name: String,
    }

    fn client() -> (Client, MockBackend) {
        let mock = MockBackend::new();
        (Client::with_backend(Box::new(mock.clone())), mock)
    }

    #[test]
    fn test_create_serializes_document() {
        let (client, mock) = client();
        let node = Node {
            name: "n1".into(),
            resource_group_name: "rg1".into(),
        };

        let created = client.create_node(&node).unwrap();

        assert_eq!(created.name, "n1");
        assert_eq!(
            mock.requests(),
            vec![MockRequest::Create(
                json!({"name": "n1", "resourceGroupName": "rg1"})
            )]
        );
    }

    #[test]
    fn test_delete_with_and_without_deallocation() {
        let (client, mock) = client();
        mock.add_node(NodeRecord::new("ssn-1", "n1"));
        mock.add_node(NodeRecord::new("ssn-2", "n2"));

        client
            .delete_node("ssn-1", Some(&json!({"shouldTerminateVm": true})))
            .unwrap();
        client.delete_node::<serde_json::Value>("ssn-2", None).unwrap();

        assert_eq!(
            mock.requests(),
            vec![
                MockRequest::Delete("ssn-1".into(), Some(json!({"shouldTerminateVm": true}))),
                MockRequest::Delete("ssn-2".into(), None),
            ]
        );
    }

    #[test]
    fn test_update_missing_node() {
        let (client, _mock) = client();
        let err = client.update_node("ssn-x", &json!({"name": "n1"})).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_state_and_list() {
        let (client, mock) = client();
        mock.add_node(NodeRecord::new("ssn-1", "n1"));

        client.update_node_state("ssn-1", NodeState::Resume).unwrap();
        assert_eq!(client.list_nodes().unwrap().len(), 1);
        assert_eq!(
            mock.requests(),
            vec![
                MockRequest::State("ssn-1".into(), NodeState::Resume),
                MockRequest::List
            ]
        );
    }
}
