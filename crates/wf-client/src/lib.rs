//! wayfarer/crates/wf-client/src/lib.rs
//!
//! The Wayfarer API client: one stable async call surface that targets
//! either a live HTTP backend or the local mock, selected once at
//! construction from [`ClientConfig`].
//!
//! ```no_run
//! use wf_client::{ApiClient, ClientConfig};
//!
//! # async fn demo() -> wf_core::error::Result<()> {
//! let client = ApiClient::new(ClientConfig::mock());
//! client.auth().login("explorer@example.com", "wander").await?;
//! client.favorites().add("1").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod surface;

pub use client::ApiClient;
pub use config::{ClientConfig, Mode};
pub use surface::{AuthApi, FavoritesApi, LocationsApi, ReviewsApi, UsersApi, VisitedApi};

// Re-export the domain types callers handle
pub use wf_core::error::{ApiError, Result};
pub use wf_core::models::{
    Attraction, AuthSession, BoundingBox, Category, ProfileUpdate, Registration, Review,
    ReviewInput, SearchQuery, SearchResult, User, VerifyChannel,
};
