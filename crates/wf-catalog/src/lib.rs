//! # wf-catalog
//! wayfarer/crates/wf-catalog/src/lib.rs
//!
//! The compiled-in attraction catalog and the viewport bounding-box query.
//! The catalog is static data; the query is pure — the same inputs always
//! produce the same result, which is what makes this slice testable without
//! either backend.

use once_cell::sync::Lazy;
use wf_core::error::{ApiError, Result};
use wf_core::models::{Attraction, SearchQuery, SearchResult};

/// The full attraction catalog, parsed once from the embedded JSON.
///
/// # Developer Note
/// A parse failure here means the shipped data file is broken, which no
/// runtime handling can fix, so the panic on first access is deliberate.
static CATALOG: Lazy<Vec<Attraction>> = Lazy::new(|| {
    serde_json::from_str(include_str!("data/attractions.json"))
        .expect("embedded attraction catalog is malformed")
});

/// Read access to the whole catalog, in canonical order.
pub fn all() -> &'static [Attraction] {
    &CATALOG
}

/// Looks up a single attraction by id.
pub fn find(id: &str) -> Option<&'static Attraction> {
    CATALOG.iter().find(|a| a.id == id)
}

/// Decimation stride for a zoom level: `max(1, 12 - min(zoom, 12))`.
/// Lower zoom (more zoomed out) yields a larger stride and fewer markers;
/// zoom levels above 12 do not reduce the stride below 1. Zoom comes off
/// the wire as an arbitrary integer, so both ends clamp before the
/// subtraction.
pub fn stride_for_zoom(zoom: i32) -> usize {
    (12 - zoom.clamp(0, 12)).max(1) as usize
}

/// Answers a viewport query against the catalog.
///
/// 1. Filter to points inside `bounds` (antimeridian-aware, see
///    [`wf_core::models::BoundingBox::contains`]).
/// 2. Keep every stride-th survivor in catalog order.
/// 3. Truncate to `limit`.
///
/// `total` is the filtered count before decimation and truncation, so the
/// UI can render "showing N of M". A negative `limit` is a validation
/// error; a zero `limit` returns no items but still reports `total`.
pub fn search(query: &SearchQuery) -> Result<SearchResult> {
    if query.limit < 0 {
        return Err(ApiError::Validation(format!(
            "limit must be non-negative, got {}",
            query.limit
        )));
    }

    let filtered: Vec<&Attraction> = CATALOG
        .iter()
        .filter(|a| query.bounds.contains(a.lat, a.lon))
        .collect();
    let total = filtered.len();

    let stride = stride_for_zoom(query.zoom);
    let items = filtered
        .into_iter()
        .step_by(stride)
        .take(query.limit as usize)
        .cloned()
        .collect();

    Ok(SearchResult { items, total })
}
