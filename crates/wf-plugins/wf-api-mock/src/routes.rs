//! # Mock route table
//!
//! A finite table of (method, path-pattern) → handler entries, evaluated in
//! order. Keeping dispatch in one table (instead of chained prefix checks)
//! makes the "no handler" fallthrough the single, obvious escape hatch.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use wf_core::error::Result;
use wf_core::traits::{ApiRequest, HttpMethod};

use crate::handlers::{self, MockContext};

/// Path parameters bound by `{name}` segments.
pub type Params = HashMap<String, String>;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type Handler =
    Box<dyn Fn(Arc<MockContext>, Params, ApiRequest) -> BoxFuture<Result<Value>> + Send + Sync>;

/// A pattern like `reviews/list/{attractionId}`: literal segments must match
/// exactly, `{name}` segments bind the incoming value.
pub struct PathPattern {
    segments: Vec<Segment>,
}

enum Segment {
    Literal(String),
    Param(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .trim_matches('/')
            .split('/')
            .map(|s| {
                if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Segment::Param(name.to_string())
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self { segments }
    }

    /// Returns the bound parameters when `path` matches, `None` otherwise.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

pub struct Route {
    pub method: HttpMethod,
    pub pattern: PathPattern,
    pub handler: Handler,
}

fn route<F, Fut>(method: HttpMethod, pattern: &str, f: F) -> Route
where
    F: Fn(Arc<MockContext>, Params, ApiRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Route {
        method,
        pattern: PathPattern::parse(pattern),
        handler: Box::new(move |cx, params, req| Box::pin(f(cx, params, req))),
    }
}

/// The complete mock API surface. Anything not listed here falls through to
/// `ApiError::NoHandler`.
pub fn table() -> Vec<Route> {
    use HttpMethod::{Get, Post};
    vec![
        route(Post, "auth/login", handlers::login),
        route(Post, "auth/register", handlers::register),
        route(Post, "auth/request-code", handlers::request_code),
        route(Post, "auth/verify-code", handlers::verify_code),
        route(Get, "users/me", handlers::current_user),
        route(Post, "users/update", handlers::update_profile),
        route(Post, "favorites/add", handlers::favorites_add),
        route(Post, "favorites/remove", handlers::favorites_remove),
        route(Get, "favorites/list", handlers::favorites_list),
        route(Post, "visited/add", handlers::visited_add),
        route(Get, "visited/list", handlers::visited_list),
        route(Post, "reviews/add", handlers::reviews_add),
        route(Get, "reviews/list/{attractionId}", handlers::reviews_list),
        route(Post, "locations/search", handlers::locations_search),
    ]
}
