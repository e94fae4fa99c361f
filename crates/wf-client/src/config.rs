//! # Client configuration
//!
//! An explicitly constructed configuration object passed to the client
//! factory. Mode is resolved once per client instance — there is no hidden
//! process-wide state, so tests can instantiate both modes side by side.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Which backend a client instance talks to, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Mock,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Live backend base URL. Absent means mock mode.
    pub base_url: Option<String>,
    /// Forces mock mode even when a base URL is configured.
    pub force_mock: bool,
    /// Device-scoped directory for persisted state (mock documents and the
    /// auth token cache).
    pub data_dir: PathBuf,
    /// Artificial latency applied to mock calls.
    pub mock_latency: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            force_mock: false,
            data_dir: PathBuf::from(".wayfarer"),
            mock_latency: Duration::from_millis(250),
        }
    }
}

impl ClientConfig {
    pub fn mock() -> Self {
        Self { force_mock: true, ..Self::default() }
    }

    pub fn live(base_url: impl Into<String>) -> Self {
        Self { base_url: Some(base_url.into()), ..Self::default() }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_mock_latency(mut self, latency: Duration) -> Self {
        self.mock_latency = latency;
        self
    }

    /// Mock when forced or when no base URL is present; live otherwise.
    /// An empty or whitespace base URL (e.g. the env var set but blank)
    /// counts as absent — a live client with nowhere to send requests
    /// would only ever answer from its fallback.
    pub fn mode(&self) -> Mode {
        let has_base_url = self
            .base_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if self.force_mock || !has_base_url {
            Mode::Mock
        } else {
            Mode::Live
        }
    }

    /// Loads configuration from `WAYFARER_*` environment variables:
    /// `WAYFARER_API_BASE_URL`, `WAYFARER_FORCE_MOCK`, `WAYFARER_DATA_DIR`.
    pub fn from_env() -> anyhow::Result<Self> {
        #[derive(Deserialize)]
        struct EnvSettings {
            api_base_url: Option<String>,
            #[serde(default)]
            force_mock: bool,
            data_dir: Option<String>,
        }

        let settings: EnvSettings = config::Config::builder()
            .add_source(config::Environment::with_prefix("WAYFARER"))
            .build()?
            .try_deserialize()?;

        let mut cfg = Self::default();
        cfg.base_url = settings.api_base_url;
        cfg.force_mock = settings.force_mock;
        if let Some(dir) = settings.data_dir {
            cfg.data_dir = PathBuf::from(dir);
        }
        Ok(cfg)
    }
}
