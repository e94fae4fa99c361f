//! # wf-api-mock
//! wayfarer/crates/wf-plugins/wf-api-mock/src/lib.rs
//!
//! Network-free implementation of `ApiBackend`. Every call sleeps a fixed
//! artificial latency (so the UI experience stays representative), then
//! dispatches through the route table to a pure local handler backed by
//! scoped storage.

pub mod handlers;
pub mod routes;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use wf_core::error::{ApiError, Result};
use wf_core::traits::{ApiBackend, ApiRequest, KeyValueStore};

use handlers::MockContext;
use routes::Route;

pub use store::{FileStore, MemoryStore};

/// Default artificial latency per call.
const DEFAULT_LATENCY: Duration = Duration::from_millis(250);

pub struct MockApiBackend {
    context: Arc<MockContext>,
    routes: Vec<Route>,
    latency: Duration,
}

impl MockApiBackend {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_latency(store, DEFAULT_LATENCY)
    }

    /// Tests pass `Duration::ZERO` so suites stay fast.
    pub fn with_latency(store: Arc<dyn KeyValueStore>, latency: Duration) -> Self {
        Self {
            context: Arc::new(MockContext::new(store)),
            routes: routes::table(),
            latency,
        }
    }
}

#[async_trait]
impl ApiBackend for MockApiBackend {
    async fn execute(&self, req: ApiRequest) -> Result<Value> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        for route in &self.routes {
            if route.method != req.method {
                continue;
            }
            if let Some(params) = route.pattern.matches(&req.path) {
                tracing::debug!(method = req.method.as_str(), path = %req.path, "mock dispatch");
                return (route.handler)(self.context.clone(), params, req).await;
            }
        }

        // Fatal during development: a call surface method without a handler
        Err(ApiError::NoHandler(req.method.as_str().to_string(), req.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> MockApiBackend {
        MockApiBackend::with_latency(Arc::new(MemoryStore::new()), Duration::ZERO)
    }

    async fn login(backend: &MockApiBackend) -> String {
        let res = backend
            .execute(ApiRequest::post(
                "auth/login",
                json!({ "email": "explorer@example.com", "password": "wander" }),
            ))
            .await
            .unwrap();
        res["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn seeded_user_can_log_in_and_bad_credentials_cannot() {
        let backend = backend();
        let res = backend
            .execute(ApiRequest::post(
                "auth/login",
                json!({ "email": "explorer@example.com", "password": "wander" }),
            ))
            .await
            .unwrap();
        assert!(res["token"].as_str().is_some());
        assert_eq!(res["user"]["username"], "explorer");

        let err = backend
            .execute(ApiRequest::post(
                "auth/login",
                json!({ "email": "explorer@example.com", "password": "wrong" }),
            ))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unauthorized: Invalid credentials");
    }

    #[tokio::test]
    async fn register_conflicts_on_duplicate_username_and_email() {
        let backend = backend();
        let reg = json!({
            "username": "ada", "firstname": "Ada", "lastname": "Byron",
            "email": "ada@example.com", "phone": "+1-555-0101", "password": "pw"
        });
        backend
            .execute(ApiRequest::post("auth/register", reg.clone()))
            .await
            .unwrap();

        let err = backend
            .execute(ApiRequest::post("auth/register", reg))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let mut other = json!({
            "username": "ada2", "firstname": "Ada", "lastname": "Byron",
            "email": "ada@example.com", "phone": "", "password": "pw"
        });
        let err = backend
            .execute(ApiRequest::post("auth/register", other.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        other["email"] = json!("ada2@example.com");
        backend
            .execute(ApiRequest::post("auth/register", other))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn favorites_add_is_idempotent() {
        let backend = backend();
        let token = login(&backend).await;

        for _ in 0..2 {
            let res = backend
                .execute(
                    ApiRequest::post("favorites/add", json!({ "attractionId": "1" }))
                        .with_token(Some(token.clone())),
                )
                .await
                .unwrap();
            assert_eq!(res["success"], true);
        }

        let list = backend
            .execute(ApiRequest::get("favorites/list").with_token(Some(token)))
            .await
            .unwrap();
        assert_eq!(list, json!(["1"]));
    }

    #[tokio::test]
    async fn favorites_remove_of_absent_id_is_a_no_op_success() {
        let backend = backend();
        let token = login(&backend).await;

        let res = backend
            .execute(
                ApiRequest::post("favorites/remove", json!({ "attractionId": "404" }))
                    .with_token(Some(token.clone())),
            )
            .await
            .unwrap();
        assert_eq!(res["success"], true);

        let list = backend
            .execute(ApiRequest::get("favorites/list").with_token(Some(token)))
            .await
            .unwrap();
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn visited_add_is_idempotent_and_separate_from_favorites() {
        let backend = backend();
        let token = login(&backend).await;

        for _ in 0..2 {
            backend
                .execute(
                    ApiRequest::post("visited/add", json!({ "attractionId": "5" }))
                        .with_token(Some(token.clone())),
                )
                .await
                .unwrap();
        }
        let visited = backend
            .execute(ApiRequest::get("visited/list").with_token(Some(token.clone())))
            .await
            .unwrap();
        assert_eq!(visited, json!(["5"]));

        let favorites = backend
            .execute(ApiRequest::get("favorites/list").with_token(Some(token)))
            .await
            .unwrap();
        assert_eq!(favorites, json!([]));
    }

    #[tokio::test]
    async fn concurrent_logins_both_keep_their_sessions() {
        let backend = Arc::new(backend());
        let creds = json!({ "email": "explorer@example.com", "password": "wander" });

        let (a, b) = tokio::join!(
            backend.execute(ApiRequest::post("auth/login", creds.clone())),
            backend.execute(ApiRequest::post("auth/login", creds)),
        );
        let token_a = a.unwrap()["token"].as_str().unwrap().to_string();
        let token_b = b.unwrap()["token"].as_str().unwrap().to_string();
        assert_ne!(token_a, token_b);

        // Both tokens must resolve on protected calls
        for token in [token_a, token_b] {
            backend
                .execute(ApiRequest::get("favorites/list").with_token(Some(token)))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn favorites_remove_rejects_an_empty_id_like_add_does() {
        let backend = backend();
        let token = login(&backend).await;

        for path in ["favorites/add", "favorites/remove"] {
            let err = backend
                .execute(
                    ApiRequest::post(path, json!({ "attractionId": "" }))
                        .with_token(Some(token.clone())),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "{path}");
        }
    }

    #[tokio::test]
    async fn protected_calls_without_a_token_are_unauthorized() {
        let backend = backend();
        let err = backend
            .execute(ApiRequest::get("favorites/list"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn reviews_upsert_keeps_one_review_per_user_with_stable_id() {
        let backend = backend();
        let token = login(&backend).await;

        let first = backend
            .execute(
                ApiRequest::post(
                    "reviews/add",
                    json!({ "attractionId": "2", "rating": 4, "comment": "lovely" }),
                )
                .with_token(Some(token.clone())),
            )
            .await
            .unwrap();
        let second = backend
            .execute(
                ApiRequest::post(
                    "reviews/add",
                    json!({ "attractionId": "2", "rating": 5, "comment": "even better" }),
                )
                .with_token(Some(token.clone())),
            )
            .await
            .unwrap();
        assert_eq!(first["reviewId"], second["reviewId"]);

        let list = backend
            .execute(ApiRequest::get("reviews/list/2"))
            .await
            .unwrap();
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["rating"], 5);
        assert_eq!(list[0]["comment"], "even better");
        assert_eq!(list[0]["authorName"], "Demo Explorer");
    }

    #[tokio::test]
    async fn review_rating_outside_range_is_rejected() {
        let backend = backend();
        let token = login(&backend).await;
        for rating in [0, 6] {
            let err = backend
                .execute(
                    ApiRequest::post(
                        "reviews/add",
                        json!({ "attractionId": "2", "rating": rating }),
                    )
                    .with_token(Some(token.clone())),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "rating {rating}");
        }
    }

    #[tokio::test]
    async fn reviews_list_of_unreviewed_attraction_is_empty() {
        let backend = backend();
        let list = backend
            .execute(ApiRequest::get("reviews/list/99"))
            .await
            .unwrap();
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn locations_search_answers_without_auth() {
        let backend = backend();
        let res = backend
            .execute(ApiRequest::post(
                "locations/search",
                json!({
                    "bounds": { "north": 41.0, "south": 40.0, "east": -73.0, "west": -75.0 },
                    "zoom": 12
                }),
            ))
            .await
            .unwrap();
        assert_eq!(res["total"], 18);
        assert_eq!(res["items"].as_array().unwrap().len(), 18);
    }

    #[tokio::test]
    async fn verification_flow_flips_the_matching_flag() {
        let backend = backend();
        let token = login(&backend).await;

        let issued = backend
            .execute(
                ApiRequest::post("auth/request-code", json!({ "channel": "phone" }))
                    .with_token(Some(token.clone())),
            )
            .await
            .unwrap();
        let code = issued["code"].as_str().unwrap().to_string();

        let err = backend
            .execute(
                ApiRequest::post(
                    "auth/verify-code",
                    json!({ "channel": "phone", "code": "000000x" }),
                )
                .with_token(Some(token.clone())),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let res = backend
            .execute(
                ApiRequest::post(
                    "auth/verify-code",
                    json!({ "channel": "phone", "code": code }),
                )
                .with_token(Some(token)),
            )
            .await
            .unwrap();
        assert_eq!(res["user"]["phoneVerified"], true);
    }

    #[tokio::test]
    async fn unknown_endpoint_is_a_no_handler_error() {
        let backend = backend();
        let err = backend
            .execute(ApiRequest::post("favorites/toggle", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NoHandler(_, _)));
        assert_eq!(err.to_string(), "no handler for POST favorites/toggle");
    }

    #[tokio::test]
    async fn state_survives_a_backend_restart_on_the_same_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let backend = MockApiBackend::with_latency(store.clone(), Duration::ZERO);
        let token = login(&backend).await;
        backend
            .execute(
                ApiRequest::post("favorites/add", json!({ "attractionId": "3" }))
                    .with_token(Some(token.clone())),
            )
            .await
            .unwrap();

        // New backend instance over the same scoped storage
        let restarted = MockApiBackend::with_latency(store, Duration::ZERO);
        let list = restarted
            .execute(ApiRequest::get("favorites/list").with_token(Some(token)))
            .await
            .unwrap();
        assert_eq!(list, json!(["3"]));
    }
}
