//! End-to-end creation and resolution flows over the in-memory store,
//! exercised through both coder strategies.

use nanolink_coder::{AnyCoder, CoderConfig, RandomSettings, ReversibleSettings};
use nanolink_core::{ShortenError, Shortener};
use nanolink_service::ShorteningService;
use nanolink_storage::InMemoryStore;

fn service(config: CoderConfig) -> ShorteningService<InMemoryStore, AnyCoder> {
    ShorteningService::new(InMemoryStore::new(), config.build().unwrap())
}

fn reversible() -> ShorteningService<InMemoryStore, AnyCoder> {
    service(CoderConfig::Reversible(
        ReversibleSettings::builder().salt("integration-salt").build(),
    ))
}

fn random() -> ShorteningService<InMemoryStore, AnyCoder> {
    service(CoderConfig::Random(RandomSettings::default()))
}

async fn create_exists_resolve_scenario(service: &dyn Shortener) {
    // First submission creates the mapping.
    let first = service.shorten("https://example.com/page").await.unwrap();
    assert!(first.created);

    // Second submission reuses it.
    let second = service.shorten("https://example.com/page").await.unwrap();
    assert!(!second.created);
    assert_eq!(first.code, second.code);

    // Resolving hands back the original URL.
    let url = service.resolve(first.code.as_str()).await.unwrap();
    assert_eq!(url, "https://example.com/page");

    // An unknown code is a not-found, not a server error.
    let err = service.resolve("zzzz").await.unwrap_err();
    assert!(matches!(err, ShortenError::NotFound(_)));
}

#[tokio::test]
async fn scenario_with_reversible_coder() {
    create_exists_resolve_scenario(&reversible()).await;
}

#[tokio::test]
async fn scenario_with_random_coder() {
    create_exists_resolve_scenario(&random()).await;
}

#[tokio::test]
async fn coder_selected_from_json_config() {
    let config: CoderConfig =
        serde_json::from_str(r#"{ "mode": "reversible", "salt": "integration-salt" }"#).unwrap();
    let service = service(config);

    let shortened = service.shorten("https://example.com/a").await.unwrap();
    let url = service.resolve(shortened.code.as_str()).await.unwrap();
    assert_eq!(url, "https://example.com/a");
}

#[tokio::test]
async fn distinct_urls_get_distinct_codes() {
    let service = random();

    let a = service.shorten("https://example.com/a").await.unwrap();
    let b = service.shorten("https://example.com/b").await.unwrap();

    assert_ne!(a.code, b.code);
}

#[tokio::test]
async fn reversible_codes_meet_min_length() {
    let service = reversible();

    for i in 0..20 {
        let url = format!("https://example.com/page/{}", i);
        let shortened = service.shorten(&url).await.unwrap();
        assert!(shortened.code.as_str().len() >= 4);
    }
}
