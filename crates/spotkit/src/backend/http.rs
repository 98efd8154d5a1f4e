//! HTTP backend.
//!
//! Talks to the Spot REST API with a blocking `ureq` agent. Non-success
//! status codes are read and turned into categorized errors here rather
//! than by ureq, so the API's error envelope is not lost.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::{
    Credentials, DEFAULT_BASE_URL, DeleteBody, ItemsEnvelope, NodeBody, NodeRecord, NodeState,
    STATEFUL_NODE_PATH, StateBody,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use ureq::http::Response;
use ureq::typestate::WithBody;
use ureq::{Body, RequestBuilder};

/// Timeout for a whole request, including reading the body.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Spot API backend over HTTPS.
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// API base URL.
    base_url: String,
    credentials: Credentials,
}

impl HttpBackend {
    /// Create a backend against the public API.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Create a backend with a custom API base (for testing).
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Get the current API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the collection, or of one node when `id` is given.
    fn url(&self, id: Option<&str>, suffix: &str) -> String {
        match id {
            Some(id) => format!("{}{STATEFUL_NODE_PATH}/{id}{suffix}", self.base_url),
            None => format!("{}{STATEFUL_NODE_PATH}{suffix}", self.base_url),
        }
    }

    /// Attach auth header and account parameter.
    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        let request = request
            .header("Authorization", format!("Bearer {}", self.credentials.token))
            .header("Accept", "application/json");
        match &self.credentials.account {
            Some(account) => request.query("accountId", account),
            None => request,
        }
    }

    /// Read the body of a response, failing on non-success status.
    fn read(mut response: Response<Body>) -> Result<String> {
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        if (200..300).contains(&status) {
            Ok(body)
        } else {
            log::debug!("HTTP {status}: {body}");
            Err(Error::from_api_response(status, &body))
        }
    }

    fn items<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
        let envelope: ItemsEnvelope<T> = serde_json::from_str(body)?;
        Ok(envelope.response.items)
    }

    fn first_item(body: &str) -> Result<NodeRecord> {
        Self::items(body)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("response has no items".to_string()))
    }

    fn send<T: Serialize>(&self, request: RequestBuilder<WithBody>, body: &T) -> Result<String> {
        let response = self.authorize(request).send_json(body)?;
        Self::read(response)
    }
}

impl Backend for HttpBackend {
    fn list_nodes(&self) -> Result<Vec<NodeRecord>> {
        let url = self.url(None, "");
        log::debug!("GET {url}");
        let response = self.authorize(self.agent.get(&url)).call()?;
        Self::items(&Self::read(response)?)
    }

    fn create_node(&self, node: &Value) -> Result<NodeRecord> {
        let url = self.url(None, "");
        log::debug!("POST {url}");
        let body = self.send(self.agent.post(&url), &NodeBody { stateful_node: node })?;
        Self::first_item(&body)
    }

    fn update_node(&self, id: &str, node: &Value) -> Result<NodeRecord> {
        let url = self.url(Some(id), "");
        log::debug!("PUT {url}");
        let body = self.send(self.agent.put(&url), &NodeBody { stateful_node: node })?;
        Self::first_item(&body)
    }

    fn delete_node(&self, id: &str, deallocation: Option<&Value>) -> Result<()> {
        let url = self.url(Some(id), "");
        log::debug!("DELETE {url}");
        let request = self.agent.delete(&url);
        let response = match deallocation {
            Some(config) => self
                .authorize(request.force_send_body())
                .send_json(DeleteBody {
                    deallocation_config: config,
                })?,
            None => self.authorize(request).call()?,
        };
        Self::read(response).map(|_| ())
    }

    fn update_node_state(&self, id: &str, state: NodeState) -> Result<()> {
        let url = self.url(Some(id), "/state");
        log::debug!("PUT {url} ({state})");
        self.send(self.agent.put(&url), &StateBody { state })
            .map(|_| ())
    }
}
