//! Operation dispatcher
//!
//! [`Reconciler`] ties the pieces together: it resolves the target through
//! the remote lookup, builds the request document (masked for updates),
//! makes exactly one mutating call and optionally chains a state transition
//! after an update. Nothing is mutated unless resolution and document
//! construction both succeed.

use crate::error::{Error, Result};
use crate::identity;
use crate::mask::apply_exclusions;
use crate::registry::TypeRegistry;
use crate::remote::RemoteApi;
use crate::transform::Transformer;
use crate::types::{Operation, Outcome, Plan, Request, Resolution};
use serde_json::Value;

/// Default top-level field of the desired state
pub const DEFAULT_ROOT_FIELD: &str = "stateful_node";

/// Default top-level field of the deallocation sub-document
pub const DEFAULT_DELETION_ROOT: &str = "deallocation_config";

/// Reconciles one resource against a remote API
pub struct Reconciler<'r, A> {
    api: A,
    registry: &'r TypeRegistry,
    root_field: String,
    deletion_root: String,
    kind: String,
}

impl<'r, A: RemoteApi> Reconciler<'r, A> {
    pub fn new(api: A, registry: &'r TypeRegistry) -> Self {
        Self {
            api,
            registry,
            root_field: DEFAULT_ROOT_FIELD.to_string(),
            deletion_root: DEFAULT_DELETION_ROOT.to_string(),
            kind: "stateful node".to_string(),
        }
    }

    /// Field name the desired state is rooted at
    pub fn root_field(mut self, root_field: impl Into<String>) -> Self {
        self.root_field = root_field.into();
        self
    }

    /// Field name the deallocation sub-document is rooted at
    pub fn deletion_root(mut self, deletion_root: impl Into<String>) -> Self {
        self.deletion_root = deletion_root.into();
        self
    }

    /// Human label used in outcome messages
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Decide the operation and target id
    pub fn resolve(&self, request: &Request) -> Result<Resolution> {
        identity::resolve(
            &request.desired_state,
            request.explicit_id.as_deref(),
            request.uniqueness_by,
            request.state,
            || self.api.lookup_all(),
        )
    }

    /// Resolve, then dispatch
    pub fn reconcile(&self, request: &Request) -> Result<Outcome> {
        let resolution = self.resolve(request)?;
        self.dispatch(&resolution, request)
    }

    /// Build what `dispatch` would send for this request, without sending it
    pub fn plan(&self, request: &Request) -> Result<Plan<A::Document, A::Deallocation>> {
        let resolution = self.resolve(request)?;

        let (document, deallocation) = match resolution.operation {
            Operation::Create | Operation::Update => {
                (Some(self.document(resolution.operation, request)?), None)
            }
            Operation::Delete => (None, self.deallocation(request)?),
        };
        let action = match resolution.operation {
            Operation::Update => request.action,
            _ => None,
        };

        Ok(Plan {
            resolution,
            document,
            deallocation,
            action,
        })
    }

    /// Run the resolved operation
    pub fn dispatch(&self, resolution: &Resolution, request: &Request) -> Result<Outcome> {
        match resolution.operation {
            Operation::Create => self.create(request),
            Operation::Update => {
                let id = target_id(resolution)?;
                self.update(id, request)
            }
            Operation::Delete => {
                let id = target_id(resolution)?;
                self.delete(id, request)
            }
        }
    }

    fn create(&self, request: &Request) -> Result<Outcome> {
        if let Some(action) = request.action {
            log::warn!("action '{action}' only runs after an update, ignoring it");
        }

        let document = self.document(Operation::Create, request)?;
        let id = self
            .api
            .create(&document)
            .map_err(|err| Error::from_remote(Operation::Create, None, err))?;
        log::info!("created {} '{id}'", self.kind);

        Ok(Outcome {
            operation: Operation::Create,
            changed: true,
            resource_id: Some(id),
            message: format!("{} created successfully", self.label()),
        })
    }

    fn update(&self, id: &str, request: &Request) -> Result<Outcome> {
        let document = self.document(Operation::Update, request)?;
        let updated_id = self
            .api
            .update(id, &document)
            .map_err(|err| Error::from_remote(Operation::Update, Some(id), err))?;
        log::info!("updated {} '{updated_id}'", self.kind);

        let mut message = format!("{} updated successfully", self.label());
        if let Some(action) = request.action {
            match self.api.transition_state(&updated_id, action) {
                Ok(()) => message.push_str(&format!(" and action '{action}' started")),
                Err(err) => {
                    log::warn!("action '{action}' failed for '{updated_id}': {err}");
                    message.push_str(&format!(" but action '{action}' failed, error: {err}"));
                }
            }
        }

        Ok(Outcome {
            operation: Operation::Update,
            changed: true,
            resource_id: Some(updated_id),
            message,
        })
    }

    fn delete(&self, id: &str, request: &Request) -> Result<Outcome> {
        let deallocation = self.deallocation(request)?;
        self.api
            .delete(id, deallocation.as_ref())
            .map_err(|err| Error::from_remote(Operation::Delete, Some(id), err))?;
        log::info!("deleted {} '{id}'", self.kind);

        Ok(Outcome {
            operation: Operation::Delete,
            changed: true,
            resource_id: Some(id.to_string()),
            message: format!("{} {id} deleted successfully", self.label()),
        })
    }

    /// Request document for create or update; updates are masked first
    fn document(&self, operation: Operation, request: &Request) -> Result<A::Document> {
        let transformer = Transformer::<A::Schema>::new(self.registry);
        if operation == Operation::Update && !request.exclusions.is_empty() {
            let masked = apply_exclusions(&request.desired_state, &request.exclusions);
            transformer.build(&masked, &self.root_field)
        } else {
            transformer.build(&request.desired_state, &self.root_field)
        }
    }

    fn deallocation(&self, request: &Request) -> Result<Option<A::Deallocation>> {
        match &request.deallocation {
            None | Some(Value::Null) => Ok(None),
            Some(tree) => Transformer::<A::Schema>::new(self.registry)
                .build(tree, &self.deletion_root)
                .map(Some),
        }
    }

    fn label(&self) -> String {
        let mut chars = self.kind.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

fn target_id(resolution: &Resolution) -> Result<&str> {
    resolution.id.as_deref().ok_or(Error::MissingId {
        operation: resolution.operation,
    })
}
