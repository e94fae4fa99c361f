//! # Core Traits (Ports)
//!
//! Any backend plugin must implement these traits to be used by the client.
//! The dispatch layer in `wf-client` only ever talks to `dyn ApiBackend`,
//! which is what lets live and mock modes swap without the UI noticing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// The HTTP verbs the API surface uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// One logical API call, mode-agnostic. The live backend turns it into an
/// HTTP request; the mock backend routes it through its handler table.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Relative endpoint path, no leading slash (e.g., "favorites/add")
    pub path: String,
    /// JSON body for POST calls; `Value::Null` for GET
    pub body: Value,
    /// Bearer token, attached by the dispatch layer when the store holds one
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: HttpMethod::Get, path: path.into(), body: Value::Null, token: None }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self { method: HttpMethod::Post, path: path.into(), body, token: None }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

/// Backend contract: answer one logical call with a JSON document.
///
/// Both implementations normalize failures into `ApiError`, so the caller
/// can treat a rejected future identically in either mode.
#[cfg_attr(feature = "test-mocks", mockall::automock)]
#[async_trait]
pub trait ApiBackend: Send + Sync {
    async fn execute(&self, req: ApiRequest) -> Result<Value>;
}

/// Scoped key-value persistence contract.
///
/// Backs the mock backend's state and the client's token cache. Scope is
/// per-device, not per-user; values survive process restarts. Reads and
/// writes are not transactional — concurrent read-modify-write cycles on
/// the same key are last-write-wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}
