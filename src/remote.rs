//! Spot API as the reconciler's remote collaborator

use crate::model::{DeallocationConfig, Schema, StatefulNode};
use declarative::{Action, RemoteApi, RemoteError, RemoteRecord};
use spotkit::{Client, NodeState};

pub struct SpotRemote {
    client: Client,
}

impl SpotRemote {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn remote_error(err: spotkit::Error) -> RemoteError {
    if err.is_not_found() {
        RemoteError::not_found(err.to_string())
    } else {
        RemoteError::service(err.to_string())
    }
}

const fn node_state(action: Action) -> NodeState {
    match action {
        Action::Pause => NodeState::Pause,
        Action::Resume => NodeState::Resume,
        Action::Recycle => NodeState::Recycle,
    }
}

impl RemoteApi for SpotRemote {
    type Schema = Schema;
    type Document = StatefulNode;
    type Deallocation = DeallocationConfig;

    fn lookup_all(&self) -> Result<Vec<RemoteRecord>, RemoteError> {
        let nodes = self.client.list_nodes().map_err(remote_error)?;
        Ok(nodes
            .into_iter()
            .map(|node| RemoteRecord::new(node.id, node.name))
            .collect())
    }

    fn create(&self, document: &StatefulNode) -> Result<String, RemoteError> {
        let node = self.client.create_node(document).map_err(remote_error)?;
        Ok(node.id)
    }

    fn update(&self, id: &str, document: &StatefulNode) -> Result<String, RemoteError> {
        let node = self.client.update_node(id, document).map_err(remote_error)?;
        Ok(node.id)
    }

    fn delete(&self, id: &str, deallocation: Option<&DeallocationConfig>) -> Result<(), RemoteError> {
        self.client.delete_node(id, deallocation).map_err(remote_error)
    }

    fn transition_state(&self, id: &str, action: Action) -> Result<(), RemoteError> {
        self.client
            .update_node_state(id, node_state(action))
            .map_err(remote_error)
    }
}
