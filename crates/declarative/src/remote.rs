//! Remote collaborator contract
//!
//! The reconciler never talks HTTP itself. Callers implement [`RemoteApi`]
//! over whatever client they have and hand it to the
//! [`Reconciler`](crate::Reconciler).

use crate::document::{DocumentSchema, FromDoc};
use crate::error::RemoteError;
use crate::types::{Action, RemoteRecord};

/// Operations the reconciler needs from the control plane
///
/// Every call is blocking and made at most once per invocation, except
/// that `transition_state` may follow a successful `update`.
pub trait RemoteApi {
    /// Closed set of document types the requests are built from
    type Schema: DocumentSchema;

    /// Request document for create and update
    type Document: FromDoc<Self::Schema>;

    /// Sub-document describing what a delete also tears down
    type Deallocation: FromDoc<Self::Schema>;

    /// List every resource visible to the current credentials
    fn lookup_all(&self) -> Result<Vec<RemoteRecord>, RemoteError>;

    /// Create a resource, returning its id
    fn create(&self, document: &Self::Document) -> Result<String, RemoteError>;

    /// Update a resource, returning its id
    fn update(&self, id: &str, document: &Self::Document) -> Result<String, RemoteError>;

    /// Delete a resource
    fn delete(&self, id: &str, deallocation: Option<&Self::Deallocation>)
    -> Result<(), RemoteError>;

    /// Run a state transition on an existing resource
    fn transition_state(&self, id: &str, action: Action) -> Result<(), RemoteError>;
}
