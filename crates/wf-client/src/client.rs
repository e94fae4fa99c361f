//! # ApiClient
//!
//! The dispatch layer: one stable call surface that hides whether requests
//! go to the live HTTP backend or the local mock. Holds the token cache and
//! implements the one-shot mock fallback for transport failures.

use std::sync::Arc;

use serde_json::Value;

use wf_api_http::HttpApiBackend;
use wf_api_mock::{FileStore, MockApiBackend};
use wf_core::error::{ApiError, Result};
use wf_core::traits::{ApiBackend, ApiRequest, KeyValueStore};

use crate::config::{ClientConfig, Mode};
use crate::surface::{AuthApi, FavoritesApi, LocationsApi, ReviewsApi, UsersApi, VisitedApi};

const TOKEN_KEY: &str = "auth_token";

pub struct ApiClient {
    primary: Arc<dyn ApiBackend>,
    /// Present only in live mode: answers a call whose live attempt failed
    /// at the transport level. One shot, never a retry loop.
    fallback: Option<Arc<dyn ApiBackend>>,
    tokens: Arc<dyn KeyValueStore>,
    mode: Mode,
}

impl ApiClient {
    /// Assembles a client from configuration. Mode is fixed here for the
    /// client's lifetime; there is no dynamic re-evaluation.
    pub fn new(config: ClientConfig) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));
        let mock = Arc::new(MockApiBackend::with_latency(store.clone(), config.mock_latency));

        match config.mode() {
            Mode::Mock => {
                tracing::info!("api client in mock mode");
                Self { primary: mock, fallback: None, tokens: store, mode: Mode::Mock }
            }
            Mode::Live => {
                // mode() == Live guarantees a base URL
                let base_url = config.base_url.as_deref().unwrap_or_default();
                tracing::info!(base_url, "api client in live mode");
                Self {
                    primary: Arc::new(HttpApiBackend::new(base_url)),
                    fallback: Some(mock),
                    tokens: store,
                    mode: Mode::Live,
                }
            }
        }
    }

    /// Wires arbitrary backends. Used by tests to drive dispatch with
    /// doubles; production code goes through [`ApiClient::new`].
    pub fn with_backends(
        primary: Arc<dyn ApiBackend>,
        fallback: Option<Arc<dyn ApiBackend>>,
        tokens: Arc<dyn KeyValueStore>,
    ) -> Self {
        let mode = if fallback.is_some() { Mode::Live } else { Mode::Mock };
        Self { primary, fallback, tokens, mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    // ── Domain surfaces ─────────────────────────────────────────────────────

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn favorites(&self) -> FavoritesApi<'_> {
        FavoritesApi::new(self)
    }

    pub fn visited(&self) -> VisitedApi<'_> {
        VisitedApi::new(self)
    }

    pub fn reviews(&self) -> ReviewsApi<'_> {
        ReviewsApi::new(self)
    }

    pub fn locations(&self) -> LocationsApi<'_> {
        LocationsApi::new(self)
    }

    // ── Token cache ─────────────────────────────────────────────────────────

    pub(crate) async fn token(&self) -> Result<Option<String>> {
        Ok(self
            .tokens
            .get(TOKEN_KEY)
            .await?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    pub(crate) async fn store_token(&self, token: &str) -> Result<()> {
        self.tokens.set(TOKEN_KEY, Value::String(token.to_string())).await
    }

    pub(crate) async fn clear_token(&self) -> Result<()> {
        self.tokens.remove(TOKEN_KEY).await
    }

    // ── Dispatch ────────────────────────────────────────────────────────────

    /// Executes one logical call, attaching the cached bearer token when
    /// present.
    ///
    /// # Developer Note
    /// Only a transport failure (no response at all) falls back to the
    /// mock, and only once — an availability-over-consistency choice for a
    /// client whose backend may be absent in development. An HTTP status
    /// error is a real answer and surfaces unchanged.
    pub(crate) async fn call(&self, req: ApiRequest) -> Result<Value> {
        let req = req.with_token(self.token().await?);
        self.dispatch(req).await
    }

    /// Like [`call`](Self::call), but fails unauthorized up front when no
    /// token is cached — no network round-trip for a call that cannot
    /// succeed.
    pub(crate) async fn call_protected(&self, req: ApiRequest) -> Result<Value> {
        let token = self
            .token()
            .await?
            .ok_or_else(|| ApiError::Unauthorized("not logged in".into()))?;
        self.dispatch(req.with_token(Some(token))).await
    }

    async fn dispatch(&self, req: ApiRequest) -> Result<Value> {
        match self.primary.execute(req.clone()).await {
            Err(e) if e.is_transport() => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(path = %req.path, error = %e, "live call failed, answering from mock");
                    fallback.execute(req).await
                }
                None => Err(e),
            },
            other => other,
        }
    }
}
