//! # Mock handlers
//!
//! Pure local implementations of every endpoint, backed by the scoped
//! key-value store. Each handler reads a JSON document, applies the same
//! semantics the live backend promises, and writes it back.
//!
//! Read-modify-write cycles within one backend are serialized by a mutex;
//! two separate processes sharing a data directory remain last-write-wins.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use uuid::Uuid;

use wf_core::error::{ApiError, Result};
use wf_core::models::{
    Credentials, PlaceRecord, ProfileUpdate, Registration, Review, ReviewInput, SearchQuery,
    User, VerifyChannel,
};
use wf_core::traits::{ApiRequest, KeyValueStore};

use crate::routes::Params;

// Storage document keys
const USERS: &str = "users";
const SESSIONS: &str = "sessions";
const FAVORITES: &str = "favorites";
const VISITED: &str = "visited";
const REVIEWS: &str = "reviews";
const CODES: &str = "verification_codes";

/// A user as persisted by the mock backend: the public shape plus the
/// password it authenticates with. The password never leaves storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    #[serde(flatten)]
    user: User,
    password: String,
}

/// Shared state for all mock handlers.
pub struct MockContext {
    store: Arc<dyn KeyValueStore>,
    /// Serializes read-modify-write cycles within this backend instance
    mutation: Mutex<()>,
}

impl MockContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, mutation: Mutex::new(()) }
    }

    async fn read_doc<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.store.get(key).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(T::default()),
        }
    }

    async fn write_doc<T: Serialize>(&self, key: &str, doc: &T) -> Result<()> {
        self.store.set(key, serde_json::to_value(doc)?).await
    }

    /// Loads the user roster, seeding a demo account on first access so a
    /// fresh install can log in without a backend.
    async fn users(&self) -> Result<Vec<StoredUser>> {
        let users: Vec<StoredUser> = self.read_doc(USERS).await?;
        if !users.is_empty() {
            return Ok(users);
        }
        let seed = vec![StoredUser {
            user: User {
                id: "demo-user".into(),
                username: "explorer".into(),
                firstname: "Demo".into(),
                lastname: "Explorer".into(),
                email: "explorer@example.com".into(),
                phone: "+1-555-0100".into(),
                email_verified: true,
                phone_verified: false,
            },
            password: "wander".into(),
        }];
        self.write_doc(USERS, &seed).await?;
        Ok(seed)
    }

    /// Resolves the bearer token on a protected call to its user.
    async fn require_user(&self, req: &ApiRequest) -> Result<User> {
        let token = req
            .token
            .as_deref()
            .ok_or_else(|| ApiError::Unauthorized("missing token".into()))?;
        let sessions: HashMap<String, String> = self.read_doc(SESSIONS).await?;
        let user_id = sessions
            .get(token)
            .ok_or_else(|| ApiError::Unauthorized("invalid or expired token".into()))?;
        let users = self.users().await?;
        users
            .into_iter()
            .find(|u| &u.user.id == user_id)
            .map(|u| u.user)
            .ok_or_else(|| ApiError::Unauthorized("invalid or expired token".into()))
    }

    /// Callers must not hold `mutation` when calling this; the lock is
    /// taken here so concurrent logins cannot drop each other's session.
    async fn issue_session(&self, user_id: &str) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let _guard = self.mutation.lock().await;
        let mut sessions: HashMap<String, String> = self.read_doc(SESSIONS).await?;
        sessions.insert(token.clone(), user_id.to_string());
        self.write_doc(SESSIONS, &sessions).await?;
        Ok(token)
    }

    async fn save_user(&self, updated: &User) -> Result<()> {
        let mut users = self.users().await?;
        if let Some(stored) = users.iter_mut().find(|u| u.user.id == updated.id) {
            stored.user = updated.clone();
        }
        self.write_doc(USERS, &users).await
    }
}

fn body<T: DeserializeOwned>(req: &ApiRequest) -> Result<T> {
    serde_json::from_value(req.body.clone())
        .map_err(|e| ApiError::Validation(format!("invalid request body: {e}")))
}

fn require_field(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{name} is required")));
    }
    Ok(())
}

// ── Auth ────────────────────────────────────────────────────────────────────

pub async fn login(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    let creds: Credentials = body(&req)?;
    require_field(&creds.email, "email")?;
    require_field(&creds.password, "password")?;

    let users = cx.users().await?;
    let found = users
        .into_iter()
        .find(|u| u.user.email.eq_ignore_ascii_case(&creds.email) && u.password == creds.password)
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".into()))?;

    let token = cx.issue_session(&found.user.id).await?;
    Ok(json!({ "token": token, "user": found.user }))
}

pub async fn register(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    let reg: Registration = body(&req)?;
    require_field(&reg.username, "username")?;
    require_field(&reg.firstname, "firstname")?;
    require_field(&reg.lastname, "lastname")?;
    require_field(&reg.email, "email")?;
    require_field(&reg.password, "password")?;
    if !reg.email.contains('@') {
        return Err(ApiError::Validation("email is not valid".into()));
    }

    let _guard = cx.mutation.lock().await;
    let mut users = cx.users().await?;
    if users.iter().any(|u| u.user.username.eq_ignore_ascii_case(&reg.username)) {
        return Err(ApiError::Conflict("Username already taken".into()));
    }
    if users.iter().any(|u| u.user.email.eq_ignore_ascii_case(&reg.email)) {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: reg.username,
        firstname: reg.firstname,
        lastname: reg.lastname,
        email: reg.email,
        phone: reg.phone,
        email_verified: false,
        phone_verified: false,
    };
    users.push(StoredUser { user: user.clone(), password: reg.password });
    cx.write_doc(USERS, &users).await?;
    drop(_guard); // issue_session takes the lock itself

    let token = cx.issue_session(&user.id).await?;
    Ok(json!({ "token": token, "user": user }))
}

#[derive(Deserialize)]
struct CodeRequest {
    channel: VerifyChannel,
}

#[derive(Deserialize)]
struct CodeSubmission {
    channel: VerifyChannel,
    code: String,
}

fn code_key(user_id: &str, channel: VerifyChannel) -> String {
    let channel = match channel {
        VerifyChannel::Email => "email",
        VerifyChannel::Phone => "phone",
    };
    format!("{user_id}:{channel}")
}

/// Issues a verification code for the caller's email or phone.
///
/// Nothing sends mail in mock mode, so the code comes back in the response
/// for the developer to feed straight into `verify-code`.
pub async fn request_code(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    let user = cx.require_user(&req).await?;
    let body: CodeRequest = body(&req)?;

    let code = format!("{:06}", Uuid::new_v4().as_u128() % 1_000_000);
    let _guard = cx.mutation.lock().await;
    let mut codes: HashMap<String, String> = cx.read_doc(CODES).await?;
    codes.insert(code_key(&user.id, body.channel), code.clone());
    cx.write_doc(CODES, &codes).await?;

    Ok(json!({ "success": true, "code": code }))
}

pub async fn verify_code(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    let mut user = cx.require_user(&req).await?;
    let submission: CodeSubmission = body(&req)?;

    let _guard = cx.mutation.lock().await;
    let mut codes: HashMap<String, String> = cx.read_doc(CODES).await?;
    let key = code_key(&user.id, submission.channel);
    match codes.get(&key) {
        Some(expected) if *expected == submission.code => {
            codes.remove(&key);
            cx.write_doc(CODES, &codes).await?;
        }
        _ => return Err(ApiError::Validation("incorrect verification code".into())),
    }

    match submission.channel {
        VerifyChannel::Email => user.email_verified = true,
        VerifyChannel::Phone => user.phone_verified = true,
    }
    cx.save_user(&user).await?;
    Ok(json!({ "success": true, "user": user }))
}

// ── Users ───────────────────────────────────────────────────────────────────

pub async fn current_user(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    let user = cx.require_user(&req).await?;
    Ok(json!({ "user": user }))
}

pub async fn update_profile(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    let mut user = cx.require_user(&req).await?;
    let update: ProfileUpdate = body(&req)?;

    let _guard = cx.mutation.lock().await;
    if let Some(firstname) = update.firstname {
        require_field(&firstname, "firstname")?;
        user.firstname = firstname;
    }
    if let Some(lastname) = update.lastname {
        require_field(&lastname, "lastname")?;
        user.lastname = lastname;
    }
    if let Some(phone) = update.phone {
        // Changing the number invalidates its verification
        user.phone = phone;
        user.phone_verified = false;
    }
    cx.save_user(&user).await?;
    Ok(json!({ "user": user }))
}

// ── Favorites / Visited ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceRef {
    attraction_id: String,
}

async fn place_add(cx: &MockContext, key: &str, req: &ApiRequest) -> Result<Value> {
    cx.require_user(req).await?;
    let place: PlaceRef = body(req)?;
    require_field(&place.attraction_id, "attractionId")?;

    let _guard = cx.mutation.lock().await;
    let mut records: Vec<PlaceRecord> = cx.read_doc(key).await?;
    // Membership pre-check makes a duplicate add a successful no-op
    if !records.iter().any(|r| r.attraction_id == place.attraction_id) {
        records.push(PlaceRecord {
            attraction_id: place.attraction_id,
            recorded_at: Utc::now(),
        });
        cx.write_doc(key, &records).await?;
    }
    Ok(json!({ "success": true }))
}

async fn place_list(cx: &MockContext, key: &str, req: &ApiRequest) -> Result<Value> {
    cx.require_user(req).await?;
    let records: Vec<PlaceRecord> = cx.read_doc(key).await?;
    let ids: Vec<String> = records.into_iter().map(|r| r.attraction_id).collect();
    Ok(json!(ids))
}

pub async fn favorites_add(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    place_add(&cx, FAVORITES, &req).await
}

pub async fn favorites_remove(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    cx.require_user(&req).await?;
    let place: PlaceRef = body(&req)?;
    require_field(&place.attraction_id, "attractionId")?;

    let _guard = cx.mutation.lock().await;
    let mut records: Vec<PlaceRecord> = cx.read_doc(FAVORITES).await?;
    let before = records.len();
    records.retain(|r| r.attraction_id != place.attraction_id);
    if records.len() != before {
        cx.write_doc(FAVORITES, &records).await?;
    }
    // Removing an absent id is still a success
    Ok(json!({ "success": true }))
}

pub async fn favorites_list(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    place_list(&cx, FAVORITES, &req).await
}

pub async fn visited_add(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    place_add(&cx, VISITED, &req).await
}

pub async fn visited_list(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    place_list(&cx, VISITED, &req).await
}

// ── Reviews ─────────────────────────────────────────────────────────────────

type ReviewsDoc = HashMap<String, Vec<Review>>;

/// Upserts the caller's review of an attraction.
///
/// # Developer Note
/// The live backend enforces one review per (user, attraction) with
/// `ON DUPLICATE KEY UPDATE`; the mock matches that here instead of
/// appending, so both modes agree. Re-submission keeps the review id
/// stable and refreshes the timestamp.
pub async fn reviews_add(cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    let user = cx.require_user(&req).await?;
    let input: ReviewInput = body(&req)?;
    require_field(&input.attraction_id, "attractionId")?;
    if !(1..=5).contains(&input.rating) {
        return Err(ApiError::Validation("rating must be between 1 and 5".into()));
    }

    let _guard = cx.mutation.lock().await;
    let mut reviews: ReviewsDoc = cx.read_doc(REVIEWS).await?;
    let entry = reviews.entry(input.attraction_id.clone()).or_default();

    let review_id = match entry.iter_mut().find(|r| r.user_id == user.id) {
        Some(existing) => {
            existing.rating = input.rating;
            existing.comment = input.comment;
            existing.created_at = Utc::now();
            existing.id.clone()
        }
        None => {
            let review = Review {
                id: Uuid::new_v4().to_string(),
                user_id: user.id.clone(),
                attraction_id: input.attraction_id,
                rating: input.rating,
                comment: input.comment,
                created_at: Utc::now(),
                author_name: format!("{} {}", user.firstname, user.lastname),
            };
            let id = review.id.clone();
            entry.push(review);
            id
        }
    };
    cx.write_doc(REVIEWS, &reviews).await?;
    Ok(json!({ "success": true, "reviewId": review_id }))
}

pub async fn reviews_list(cx: Arc<MockContext>, params: Params, _req: ApiRequest) -> Result<Value> {
    let attraction_id = params
        .get("attractionId")
        .ok_or_else(|| ApiError::Internal("route bound no attractionId".into()))?;
    let reviews: ReviewsDoc = cx.read_doc(REVIEWS).await?;
    let list = reviews.get(attraction_id).cloned().unwrap_or_default();
    Ok(serde_json::to_value(list)?)
}

// ── Locations ───────────────────────────────────────────────────────────────

pub async fn locations_search(_cx: Arc<MockContext>, _p: Params, req: ApiRequest) -> Result<Value> {
    let query: SearchQuery = body(&req)?;
    let result = wf_catalog::search(&query)?;
    Ok(serde_json::to_value(result)?)
}
