//! # Wayfarer demo binary
//!
//! Assembles a client from the environment and walks the main flows once:
//! log in, search the viewport, favorite something, leave a review. Useful
//! for smoke-testing either mode end to end (`WAYFARER_API_BASE_URL` unset
//! or `WAYFARER_FORCE_MOCK=true` exercises the mock path).

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use wf_client::{ApiClient, ClientConfig, ReviewInput, SearchQuery};
use wf_core::models::BoundingBox;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ClientConfig::from_env().context("loading WAYFARER_* configuration")?;
    tracing::info!(mode = ?config.mode(), "starting wayfarer demo");
    let client = ApiClient::new(config);

    // 1. Authenticate (the mock seeds this demo account)
    let session = client
        .auth()
        .login("explorer@example.com", "wander")
        .await
        .context("login")?;
    tracing::info!(user = %session.user.username, "logged in");

    // 2. Viewport search over lower Manhattan and surroundings
    let result = client
        .locations()
        .search(SearchQuery {
            bounds: BoundingBox { north: 41.0, south: 40.0, east: -73.0, west: -75.0 },
            zoom: 11,
            limit: 50,
        })
        .await
        .context("viewport search")?;
    tracing::info!(
        shown = result.items.len(),
        total = result.total,
        "viewport search"
    );
    for attraction in &result.items {
        println!("{:<40} {:?}", attraction.name, attraction.category);
    }

    // 3. Favorite the first hit, twice — the second add is a no-op
    if let Some(first) = result.items.first() {
        client.favorites().add(&first.id).await?;
        client.favorites().add(&first.id).await?;
        let favorites = client.favorites().list().await?;
        tracing::info!(?favorites, "favorites after double add");

        // 4. Review it; re-running the demo upserts rather than duplicating
        let review_id = client
            .reviews()
            .add(ReviewInput {
                attraction_id: first.id.clone(),
                rating: 5,
                comment: Some("worth the detour".into()),
            })
            .await?;
        tracing::info!(review_id, "review stored");
    }

    Ok(())
}
