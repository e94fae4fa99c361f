//! End-to-end flows through the public client surface, mock mode and the
//! live-to-mock fallback. Each test gets its own scratch data directory so
//! clients never share scoped storage.

use std::path::PathBuf;
use std::time::Duration;

use wf_client::{
    ApiClient, ApiError, BoundingBox, ClientConfig, Mode, ProfileUpdate, ReviewInput,
    SearchQuery, VerifyChannel,
};

struct Scratch(PathBuf);

impl Scratch {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("wf-client-{}", uuid::Uuid::new_v4())))
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

fn mock_client(scratch: &Scratch) -> ApiClient {
    ApiClient::new(
        ClientConfig::mock()
            .with_data_dir(&scratch.0)
            .with_mock_latency(Duration::ZERO),
    )
}

async fn login(client: &ApiClient) {
    client
        .auth()
        .login("explorer@example.com", "wander")
        .await
        .expect("seeded demo login should succeed");
}

#[tokio::test]
async fn favorite_twice_then_list_returns_the_id_once() {
    let scratch = Scratch::new();
    let client = mock_client(&scratch);
    login(&client).await;

    client.favorites().add("1").await.unwrap();
    client.favorites().add("1").await.unwrap();
    assert_eq!(client.favorites().list().await.unwrap(), vec!["1".to_string()]);

    // Removing something absent is still fine
    client.favorites().remove("404").await.unwrap();
    assert_eq!(client.favorites().list().await.unwrap(), vec!["1".to_string()]);
}

#[tokio::test]
async fn visited_mirrors_favorite_idempotence() {
    let scratch = Scratch::new();
    let client = mock_client(&scratch);
    login(&client).await;

    client.visited().add("7").await.unwrap();
    client.visited().add("7").await.unwrap();
    assert_eq!(client.visited().list().await.unwrap(), vec!["7".to_string()]);
}

#[tokio::test]
async fn viewport_search_through_the_surface() {
    let scratch = Scratch::new();
    let client = mock_client(&scratch);

    let nyc = BoundingBox { north: 41.0, south: 40.0, east: -73.0, west: -75.0 };
    let all = client
        .locations()
        .search(SearchQuery { bounds: nyc, zoom: 12, limit: 200 })
        .await
        .unwrap();
    assert_eq!(all.items.len(), all.total);
    assert_eq!(all.total, 18);

    let sparse = client
        .locations()
        .search(SearchQuery { bounds: nyc, zoom: 1, limit: 200 })
        .await
        .unwrap();
    assert_eq!(sparse.total, 18);
    assert_eq!(sparse.items.len(), 2); // ceil(18 / 11)
    for a in &sparse.items {
        assert!(nyc.contains(a.lat, a.lon));
    }

    let err = client
        .locations()
        .search(SearchQuery { bounds: nyc, zoom: 12, limit: -5 })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn review_resubmission_is_an_upsert_with_a_stable_id() {
    let scratch = Scratch::new();
    let client = mock_client(&scratch);
    login(&client).await;

    let first = client
        .reviews()
        .add(ReviewInput { attraction_id: "2".into(), rating: 3, comment: None })
        .await
        .unwrap();
    let second = client
        .reviews()
        .add(ReviewInput {
            attraction_id: "2".into(),
            rating: 5,
            comment: Some("came back in spring".into()),
        })
        .await
        .unwrap();
    assert_eq!(first, second);

    let reviews = client.reviews().list("2").await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].rating, 5);
}

#[tokio::test]
async fn profile_and_verification_flow() {
    let scratch = Scratch::new();
    let client = mock_client(&scratch);
    login(&client).await;

    let me = client.users().me().await.unwrap();
    assert_eq!(me.username, "explorer");
    assert!(!me.phone_verified);

    let updated = client
        .users()
        .update_profile(ProfileUpdate { phone: Some("+1-555-0199".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.phone, "+1-555-0199");

    let code = client
        .auth()
        .request_code(VerifyChannel::Phone)
        .await
        .unwrap()
        .expect("mock surfaces the code");
    let verified = client.auth().verify_code(VerifyChannel::Phone, &code).await.unwrap();
    assert!(verified.phone_verified);
}

#[tokio::test]
async fn logout_makes_protected_calls_fail_without_a_round_trip() {
    let scratch = Scratch::new();
    let client = mock_client(&scratch);
    login(&client).await;

    client.auth().logout().await.unwrap();
    let err = client.favorites().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
}

#[tokio::test]
async fn unreachable_live_backend_falls_back_to_mock() {
    let scratch = Scratch::new();
    // Discard port on loopback: every call fails at the transport level
    let client = ApiClient::new(
        ClientConfig::live("http://127.0.0.1:9/api")
            .with_data_dir(&scratch.0)
            .with_mock_latency(Duration::ZERO),
    );
    assert_eq!(client.mode(), Mode::Live);

    // The mock answers the same logical call with a structurally valid
    // response: a session for the seeded demo account.
    let session = client
        .auth()
        .login("explorer@example.com", "wander")
        .await
        .unwrap();
    assert!(!session.token.is_empty());
    assert_eq!(session.user.username, "explorer");

    client.favorites().add("1").await.unwrap();
    assert_eq!(client.favorites().list().await.unwrap(), vec!["1".to_string()]);
}

#[tokio::test]
async fn both_modes_can_coexist_in_one_process() {
    let a = Scratch::new();
    let b = Scratch::new();
    let mock = mock_client(&a);
    let live = ApiClient::new(
        ClientConfig::live("http://127.0.0.1:9/api")
            .with_data_dir(&b.0)
            .with_mock_latency(Duration::ZERO),
    );
    assert_eq!(mock.mode(), Mode::Mock);
    assert_eq!(live.mode(), Mode::Live);
}

#[tokio::test]
async fn invalid_credentials_do_not_fall_back_or_retry() {
    let scratch = Scratch::new();
    let client = mock_client(&scratch);
    let err = client
        .auth()
        .login("explorer@example.com", "nope")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "unauthorized: Invalid credentials");
}
