//! # Declarative
//!
//! Desired-state reconciliation for a single remote resource.
//!
//! This crate turns a loosely typed configuration tree into a typed request
//! document, decides which one operation (create, update or delete) brings
//! the remote resource in line with it, and dispatches that operation through
//! a caller-supplied remote API.
//!
//! ## Core Concepts
//!
//! - **FieldPath**: A dotted location in a configuration tree
//! - **TypeRegistry**: Path-keyed overrides for the document type at a node
//! - **Transformer**: Builds typed documents from configuration trees
//! - **Exclusion mask**: Prunes "do not update" paths before an update
//! - **Identity resolution**: Maps presence, uniqueness and remote state to an operation
//! - **Reconciler**: Runs the resolved operation against a [`RemoteApi`]
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{Reconciler, Request, TypeRegistry, UniquenessBy};
//!
//! declarative::document_schema! {
//!     pub enum Schema;
//!
//!     struct StatefulNode { name: String, region: String }
//!     struct DeallocationConfig { should_terminate_vm: bool }
//! }
//!
//! let registry = TypeRegistry::new();
//! let reconciler = Reconciler::new(MyApi::connect()?, &registry);
//!
//! let mut request = Request::new(serde_json::json!({"name": "n1", "region": "eastus"}));
//! request.uniqueness_by = UniquenessBy::Name;
//!
//! let outcome = reconciler.reconcile(&request)?;
//! println!("{}", outcome.message);
//! ```
//!
//! ## Provider Traits
//!
//! The crate uses traits for dependency injection:
//!
//! - [`RemoteApi`]: The control plane the reconciler talks to
//! - [`DocumentSchema`]: The closed set of request document types
//!
//! This keeps the engine free of HTTP clients and concrete resource fields.

pub mod document;
pub mod error;
pub mod identity;
pub mod mask;
pub mod path;
pub mod reconcile;
pub mod registry;
pub mod remote;
pub mod transform;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export main types at crate root
pub use document::{DocValue, DocumentSchema, FieldError, FromDoc};
pub use error::{Error, ErrorCategory, RemoteError, RemoteErrorKind, Result};
pub use mask::apply_exclusions;
pub use path::{FieldPath, parse_all};
pub use reconcile::{DEFAULT_DELETION_ROOT, DEFAULT_ROOT_FIELD, Reconciler};
pub use registry::{TypeRegistry, pascal_case};
pub use remote::RemoteApi;
pub use transform::Transformer;
pub use types::{
    Action, Operation, Outcome, Plan, Presence, RemoteRecord, Request, Resolution, UniquenessBy,
};
