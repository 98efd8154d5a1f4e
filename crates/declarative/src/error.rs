//! Error types for reconciliation.
//!
//! Every error aborts the invocation it occurs in. Errors raised before
//! dispatch guarantee that no mutating call was attempted; the category
//! tells the caller where in the pipeline the failure happened.

use crate::path::FieldPath;
use crate::types::Operation;
use thiserror::Error;

/// Categories of reconciliation errors for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration tree does not fit the document schema
    Schema,
    /// Invalid parameter (state, action, path, uniqueness strategy)
    Config,
    /// Identity could not be resolved to a single target
    Identity,
    /// Remote no longer knows the target id
    NotFound,
    /// Remote rejected the call or could not be reached
    Remote,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Schema => "Configuration does not match the request schema",
            Self::Config => "Invalid parameter",
            Self::Identity => "Could not determine the target resource",
            Self::NotFound => "Resource not found",
            Self::Remote => "Remote API error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Schema => "Check field names and value types against the documented options",
            Self::Config => "Check the allowed values for the parameter",
            Self::Identity => "Pass an explicit id and set uniqueness to 'id', or make names unique",
            Self::NotFound => "The resource may have been deleted; re-run to create it",
            Self::Remote => "Check the error details returned by the API",
        }
    }
}

/// Failure reported by the remote collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    /// What kind of failure this is
    pub kind: RemoteErrorKind,
    /// Message passed through from the API
    pub message: String,
}

/// Sub-kinds of remote failures the dispatcher distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Target id is unknown to the remote
    NotFound,
    /// Any other API-level failure
    Service,
}

impl RemoteError {
    /// The target resource does not exist
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::NotFound,
            message: message.into(),
        }
    }

    /// Generic API failure
    pub fn service(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Service,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == RemoteErrorKind::NotFound
    }
}

/// Errors that can occur while reconciling a resource.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed dotted path
    #[error("invalid field path '{0}'")]
    InvalidPath(String),

    /// Resolved type name has no document type
    #[error("unknown document type '{type_name}' for '{path}'")]
    UnknownType {
        /// Path of the object node
        path: FieldPath,
        /// Name that failed to resolve
        type_name: String,
    },

    /// Document type has no such field
    #[error("{type_name} has no field '{field}' (at '{path}')")]
    UnknownField {
        /// Path of the object node holding the field
        path: FieldPath,
        /// Document type of that node
        type_name: &'static str,
        /// Offending key
        field: String,
    },

    /// Value does not fit the declared field type
    #[error("'{path}' expects {expected}")]
    FieldType {
        /// Path of the field
        path: FieldPath,
        /// Description of the declared type
        expected: String,
    },

    /// State is neither present nor absent
    #[error("unknown state '{0}', expected 'present' or 'absent'")]
    UnknownState(String),

    /// Uniqueness strategy is neither id nor name
    #[error("unknown uniqueness strategy '{0}', expected 'id' or 'name'")]
    UnknownUniqueness(String),

    /// Action is not one of pause, resume, recycle
    #[error("unknown action '{0}', expected 'pause', 'resume' or 'recycle'")]
    UnknownAction(String),

    /// Name lookup requested but the desired state has no name
    #[error("uniqueness is by name but the desired state has no 'name'")]
    MissingName,

    /// Id required but not supplied
    #[error("cannot {operation}: uniqueness is by id but no id was provided")]
    MissingId {
        /// Operation that needed the id
        operation: Operation,
    },

    /// More than one remote resource carries the name
    #[error("cannot {operation}: uniqueness is by name but {count} resources are named '{name}'")]
    AmbiguousName {
        /// Operation that was about to run
        operation: Operation,
        /// Name that was looked up
        name: String,
        /// Number of matches
        count: usize,
    },

    /// No remote resource carries the name
    #[error("cannot {operation}: uniqueness is by name but no resource is named '{name}'")]
    NameNotFound {
        /// Operation that was about to run
        operation: Operation,
        /// Name that was looked up
        name: String,
    },

    /// Listing existing resources failed
    #[error("failed to list existing resources: {0}")]
    Lookup(#[source] RemoteError),

    /// Target id unknown to the remote
    #[error("{operation} failed: resource '{id}' does not exist")]
    RemoteNotFound {
        /// Operation that failed
        operation: Operation,
        /// Target id
        id: String,
    },

    /// Remote rejected the mutating call
    #[error("{operation} failed{}: {message}", .id.as_ref().map(|i| format!(" for '{i}'")).unwrap_or_default())]
    Remote {
        /// Operation that failed
        operation: Operation,
        /// Target id, if there was one
        id: Option<String>,
        /// Message passed through from the API
        message: String,
    },
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::UnknownType { .. } | Error::UnknownField { .. } | Error::FieldType { .. } => {
                ErrorCategory::Schema
            }
            Error::InvalidPath(_)
            | Error::UnknownState(_)
            | Error::UnknownUniqueness(_)
            | Error::UnknownAction(_) => ErrorCategory::Config,
            Error::MissingName
            | Error::MissingId { .. }
            | Error::AmbiguousName { .. }
            | Error::NameNotFound { .. } => ErrorCategory::Identity,
            Error::RemoteNotFound { .. } => ErrorCategory::NotFound,
            Error::Lookup(_) | Error::Remote { .. } => ErrorCategory::Remote,
        }
    }

    /// Map a failed mutating call onto the taxonomy
    pub(crate) fn from_remote(operation: Operation, id: Option<&str>, err: RemoteError) -> Self {
        match (err.kind, id) {
            (RemoteErrorKind::NotFound, Some(id)) => Error::RemoteNotFound {
                operation,
                id: id.to_string(),
            },
            _ => Error::Remote {
                operation,
                id: id.map(str::to_string),
                message: err.message,
            },
        }
    }
}

/// Result type for reconciliation.
pub type Result<T> = std::result::Result<T, Error>;
