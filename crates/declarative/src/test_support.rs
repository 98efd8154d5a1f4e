//! Small document schema and recording remote for unit tests

use crate::error::RemoteError;
use crate::registry::TypeRegistry;
use crate::remote::RemoteApi;
use crate::types::{Action, RemoteRecord};
use std::cell::RefCell;

crate::document_schema! {
    pub enum TestSchema;

    struct Node {
        name: String,
        region: String,
        resource_group_name: String,
        description: String,
        compute: Compute,
    }

    struct Compute {
        os: String,
        zones: Vec<String>,
        os_disk: OsDisk,
        tags: Vec<Tag>,
    }

    struct OsDisk {
        size_g_b: i64,
        r#type: String,
    }

    struct Tag {
        tag_key: String,
        tag_value: String,
    }

    struct DeallocationConfig {
        disk_deallocation_config: Deallocate,
        should_terminate_vm: bool,
    }

    struct Deallocate {
        should_deallocate: bool,
        ttl_in_hours: i64,
    }
}

pub fn test_registry() -> TypeRegistry {
    TypeRegistry::from_tables(
        &[
            ("node.compute.tags", "Tag"),
            ("deallocation_config.disk_deallocation_config", "Deallocate"),
        ],
        &[],
    )
    .unwrap()
}

/// Calls seen by [`FakeRemote`], in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LookupAll,
    Create(Node),
    Update(String, Node),
    Delete(String, Option<DeallocationConfig>),
    Transition(String, Action),
}

/// In-memory remote that records every call
#[derive(Default)]
pub struct FakeRemote {
    pub records: Vec<RemoteRecord>,
    pub created_id: String,
    pub fail_create: Option<RemoteError>,
    pub fail_update: Option<RemoteError>,
    pub fail_delete: Option<RemoteError>,
    pub fail_transition: Option<RemoteError>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            created_id: "ssn-new".into(),
            ..Default::default()
        }
    }

    pub fn with_records(mut self, records: &[(&str, &str)]) -> Self {
        self.records = records
            .iter()
            .map(|(id, name)| RemoteRecord::new(*id, *name))
            .collect();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls other than the lookup
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::LookupAll)
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl RemoteApi for FakeRemote {
    type Schema = TestSchema;
    type Document = Node;
    type Deallocation = DeallocationConfig;

    fn lookup_all(&self) -> Result<Vec<RemoteRecord>, RemoteError> {
        self.record(Call::LookupAll);
        Ok(self.records.clone())
    }

    fn create(&self, document: &Node) -> Result<String, RemoteError> {
        self.record(Call::Create(document.clone()));
        match &self.fail_create {
            Some(err) => Err(err.clone()),
            None => Ok(self.created_id.clone()),
        }
    }

    fn update(&self, id: &str, document: &Node) -> Result<String, RemoteError> {
        self.record(Call::Update(id.to_string(), document.clone()));
        match &self.fail_update {
            Some(err) => Err(err.clone()),
            None => Ok(id.to_string()),
        }
    }

    fn delete(
        &self,
        id: &str,
        deallocation: Option<&DeallocationConfig>,
    ) -> Result<(), RemoteError> {
        self.record(Call::Delete(id.to_string(), deallocation.cloned()));
        match &self.fail_delete {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn transition_state(&self, id: &str, action: Action) -> Result<(), RemoteError> {
        self.record(Call::Transition(id.to_string(), action));
        match &self.fail_transition {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
