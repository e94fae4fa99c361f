//! # wf-api-http
//! wayfarer/crates/wf-plugins/wf-api-http/src/lib.rs
//!
//! Live implementation of `ApiBackend`: turns logical calls into HTTP
//! requests against a configured base URL and normalizes every failure
//! into `ApiError`.

use async_trait::async_trait;
use serde_json::Value;
use wf_core::error::{ApiError, Result};
use wf_core::traits::{ApiBackend, ApiRequest, HttpMethod};

pub struct HttpApiBackend {
    client: reqwest::Client,
    /// Base URL without a trailing slash (e.g., "https://api.example.com/api")
    base_url: String,
}

impl HttpApiBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ApiBackend for HttpApiBackend {
    /// Issues the HTTP request for one logical call.
    ///
    /// # Developer Note
    /// `reqwest::Error` from `send()` means no response arrived at all —
    /// that becomes `ApiError::Transport`, the only error the dispatch
    /// layer may answer with its mock fallback. A non-success status is a
    /// real answer and surfaces as `ApiError::Http`.
    async fn execute(&self, req: ApiRequest) -> Result<Value> {
        let url = self.url_for(&req.path);

        let mut builder = match req.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url).json(&req.body),
        };
        if let Some(token) = &req.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(path = %req.path, error = %e, "live backend unreachable");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(normalize_failure(status.as_u16(), &text));
        }
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::Internal(format!("bad JSON from backend: {e}")))
    }
}

/// Extracts the best human-readable message from a failed response body.
///
/// Tries a JSON `message` field, then `error`, then the raw body text, then
/// a generic `HTTP <status>`. Well-known statuses map to their taxonomy
/// variant so the UI can distinguish auth failures from conflicts.
fn normalize_failure(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    match status {
        401 | 403 => ApiError::Unauthorized(message),
        404 => ApiError::NotFound("resource".into(), message),
        409 => ApiError::Conflict(message),
        422 => ApiError::Validation(message),
        _ => ApiError::Http { status, message },
    }
}
