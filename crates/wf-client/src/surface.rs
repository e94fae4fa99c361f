//! # Domain surfaces
//!
//! The typed call surface UI code uses: `client.auth().login(...)`,
//! `client.favorites().add(...)`, and so on. Each method validates what it
//! can locally (no round-trip for input the backend would reject anyway),
//! builds the wire request, and parses the normalized response.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use wf_core::error::{ApiError, Result};
use wf_core::models::{
    AuthSession, ProfileUpdate, Registration, Review, ReviewInput, SearchQuery, SearchResult,
    User, VerifyChannel,
};
use wf_core::traits::ApiRequest;

use crate::client::ApiClient;

fn parse<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::Internal(format!("unexpected response shape: {e}")))
}

fn require(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{name} is required")));
    }
    Ok(())
}

// ── Auth ────────────────────────────────────────────────────────────────────

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Logs in and caches the bearer token for subsequent calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        require(email, "email")?;
        require(password, "password")?;

        let res = self
            .client
            .call(ApiRequest::post(
                "auth/login",
                json!({ "email": email, "password": password }),
            ))
            .await?;
        let session: AuthSession = parse(res)?;
        self.client.store_token(&session.token).await?;
        Ok(session)
    }

    /// Registers a new account and caches the issued token.
    pub async fn register(&self, registration: Registration) -> Result<AuthSession> {
        require(&registration.username, "username")?;
        require(&registration.email, "email")?;
        require(&registration.password, "password")?;

        let res = self
            .client
            .call(ApiRequest::post(
                "auth/register",
                serde_json::to_value(&registration)?,
            ))
            .await?;
        let session: AuthSession = parse(res)?;
        self.client.store_token(&session.token).await?;
        Ok(session)
    }

    /// Requests a verification code for the given channel. The mock backend
    /// returns the code directly (nothing sends mail offline); the live
    /// backend delivers out of band and returns nothing.
    pub async fn request_code(&self, channel: VerifyChannel) -> Result<Option<String>> {
        let res = self
            .client
            .call_protected(ApiRequest::post(
                "auth/request-code",
                json!({ "channel": channel }),
            ))
            .await?;
        Ok(res.get("code").and_then(Value::as_str).map(str::to_string))
    }

    /// Submits a verification code; on success returns the refreshed user
    /// with the matching flag set.
    pub async fn verify_code(&self, channel: VerifyChannel, code: &str) -> Result<User> {
        require(code, "code")?;
        let res = self
            .client
            .call_protected(ApiRequest::post(
                "auth/verify-code",
                json!({ "channel": channel, "code": code }),
            ))
            .await?;
        parse(res.get("user").cloned().unwrap_or(Value::Null))
    }

    /// Drops the cached token. Purely local; tokens are not revoked
    /// server-side.
    pub async fn logout(&self) -> Result<()> {
        self.client.clear_token().await
    }
}

// ── Users ───────────────────────────────────────────────────────────────────

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> Result<User> {
        let res = self.client.call_protected(ApiRequest::get("users/me")).await?;
        parse(res.get("user").cloned().unwrap_or(Value::Null))
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        let res = self
            .client
            .call_protected(ApiRequest::post("users/update", serde_json::to_value(&update)?))
            .await?;
        parse(res.get("user").cloned().unwrap_or(Value::Null))
    }
}

// ── Favorites / Visited ─────────────────────────────────────────────────────

pub struct FavoritesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FavoritesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Adding an attraction already in the set is a successful no-op.
    pub async fn add(&self, attraction_id: &str) -> Result<()> {
        require(attraction_id, "attractionId")?;
        self.client
            .call_protected(ApiRequest::post(
                "favorites/add",
                json!({ "attractionId": attraction_id }),
            ))
            .await?;
        Ok(())
    }

    /// Removing an attraction not in the set is a successful no-op.
    pub async fn remove(&self, attraction_id: &str) -> Result<()> {
        require(attraction_id, "attractionId")?;
        self.client
            .call_protected(ApiRequest::post(
                "favorites/remove",
                json!({ "attractionId": attraction_id }),
            ))
            .await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<String>> {
        let res = self
            .client
            .call_protected(ApiRequest::get("favorites/list"))
            .await?;
        parse(res)
    }
}

pub struct VisitedApi<'a> {
    client: &'a ApiClient,
}

impl<'a> VisitedApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn add(&self, attraction_id: &str) -> Result<()> {
        require(attraction_id, "attractionId")?;
        self.client
            .call_protected(ApiRequest::post(
                "visited/add",
                json!({ "attractionId": attraction_id }),
            ))
            .await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<String>> {
        let res = self.client.call_protected(ApiRequest::get("visited/list")).await?;
        parse(res)
    }
}

// ── Reviews ─────────────────────────────────────────────────────────────────

pub struct ReviewsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReviewsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Upserts the caller's review; returns the (stable) review id.
    pub async fn add(&self, input: ReviewInput) -> Result<String> {
        require(&input.attraction_id, "attractionId")?;
        if !(1..=5).contains(&input.rating) {
            return Err(ApiError::Validation("rating must be between 1 and 5".into()));
        }

        let res = self
            .client
            .call_protected(ApiRequest::post("reviews/add", serde_json::to_value(&input)?))
            .await?;
        res.get("reviewId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Internal("response missing reviewId".into()))
    }

    /// Reviews are public; no token required.
    pub async fn list(&self, attraction_id: &str) -> Result<Vec<Review>> {
        require(attraction_id, "attractionId")?;
        let res = self
            .client
            .call(ApiRequest::get(format!("reviews/list/{attraction_id}")))
            .await?;
        parse(res)
    }
}

// ── Locations ───────────────────────────────────────────────────────────────

pub struct LocationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> LocationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Viewport search: filtered, density-reduced attractions plus the true
    /// match count. A negative limit is rejected here so both modes agree
    /// without a round-trip.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResult> {
        if query.limit < 0 {
            return Err(ApiError::Validation(format!(
                "limit must be non-negative, got {}",
                query.limit
            )));
        }

        let res = self
            .client
            .call(ApiRequest::post(
                "locations/search",
                serde_json::to_value(&query)?,
            ))
            .await?;
        parse(res)
    }
}
