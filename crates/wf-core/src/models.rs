//! # Domain Models
//!
//! These structs represent the core entities of the Wayfarer client and the
//! JSON shapes both backends exchange. Wire fields use camelCase to match
//! the backend contract; everything else follows Rust conventions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog category for an attraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Landmark,
    Museum,
    Park,
    Cultural,
}

/// An immutable catalog entry. Loaded from the compiled-in catalog,
/// never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attraction {
    pub id: String,
    pub name: String,
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east, range [-180, 180]
    pub lon: f64,
    pub category: Category,
    pub description: String,
    pub fact: String,
    /// Asset reference resolved by the UI layer
    pub image: String,
}

/// A map viewport in geographic degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Containment test for a single point.
    ///
    /// # Developer Note
    /// When `west > east` the box wraps the antimeridian (±180°): a point
    /// matches when its longitude is `>= west` OR `<= east`. A zero-area box
    /// (`west == east` or `north == south`) is a degenerate filter, not an
    /// error; it simply matches few or no points.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if lat < self.south || lat > self.north {
            return false;
        }
        if self.west > self.east {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }
}

/// Query parameters for the viewport attraction search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub bounds: BoundingBox,
    /// Map zoom level; lower means more zoomed out. Defaults to 10.
    #[serde(default = "default_zoom")]
    pub zoom: i32,
    /// Maximum number of returned items. Defaults to 200.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_zoom() -> i32 {
    10
}

fn default_limit() -> i64 {
    200
}

/// Result of a viewport search: the decimated items plus the true match
/// count, so callers can render "showing N of M".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub items: Vec<Attraction>,
    /// Pre-decimation, pre-truncation count of catalog points inside bounds
    pub total: usize,
}

/// A registered user. Owned by the backend; the client holds a cached copy
/// refreshed after auth or profile-update calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub email_verified: bool,
    pub phone_verified: bool,
}

/// A review of an attraction. One logical review per (user, attraction);
/// re-submission replaces the previous one and keeps the id stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub attraction_id: String,
    /// Star rating, 1..=5
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Denormalized for list rendering without a user lookup
    pub author_name: String,
}

/// A (user, attraction) membership record used for both favorites and
/// visited lists. At most one per pair; duplicate adds are no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub attraction_id: String,
    pub recorded_at: DateTime<Utc>,
}

/// Verification channel for account confirmation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyChannel {
    Email,
    Phone,
}

// ── Wire payloads shared by the client surface and the mock handlers ────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub attraction_id: String,
    pub rating: u8,
    pub comment: Option<String>,
}

/// Successful login or registration: the bearer token plus the fresh user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}
