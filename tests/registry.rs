use std::sync::Arc;

use linkharvest::application::services::SourceRegistry;
use linkharvest::infrastructure::persistence::{MemoryStore, StateStore};

async fn fresh_registry() -> SourceRegistry {
    SourceRegistry::load(Arc::new(MemoryStore::new())).await
}

// ─── CHANNELS ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_channel_spellings_share_one_registration() {
    let registry = fresh_registry().await;

    assert!(registry.add_channel("@persian_movies", None).await.unwrap());
    assert!(!registry.add_channel("persian_movies", None).await.unwrap());
    assert!(!registry
        .add_channel("t.me/persian_movies", None)
        .await
        .unwrap());

    assert_eq!(registry.channels().await, vec!["persian_movies"]);
}

#[tokio::test]
async fn test_invalid_channel_leaves_registry_untouched() {
    let registry = fresh_registry().await;

    assert!(registry.add_channel("", None).await.is_err());
    assert!(registry.add_channel("@", None).await.is_err());
    assert!(registry
        .add_channel("t.me/some/nested/path", None)
        .await
        .is_err());

    assert!(registry.channels().await.is_empty());
}

#[tokio::test]
async fn test_channel_category_lifecycle() {
    let registry = fresh_registry().await;
    registry.add_channel("newsfeed", Some("خبری")).await.unwrap();

    assert_eq!(
        registry.channel_category("newsfeed").await.as_deref(),
        Some("خبری")
    );

    registry
        .set_channel_category("newsfeed", "علمی و آموزشی")
        .await
        .unwrap();
    assert_eq!(
        registry.channel_category("newsfeed").await.as_deref(),
        Some("علمی و آموزشی")
    );

    registry.remove_channel("newsfeed").await.unwrap();
    assert!(registry.channel_category("newsfeed").await.is_none());
}

// ─── WEBSITES ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_website_scheme_is_normalized() {
    let registry = fresh_registry().await;

    assert!(registry
        .add_website("groups.example.com/list", None)
        .await
        .unwrap());
    assert_eq!(
        registry.websites().await,
        vec!["https://groups.example.com/list"]
    );

    // Explicit http is kept as given.
    assert!(registry
        .add_website("http://other.example.com", None)
        .await
        .unwrap());
    assert!(registry
        .websites()
        .await
        .contains(&"http://other.example.com".to_string()));
}

// ─── COUNTERS AND TIMESTAMPS ─────────────────────────────────────────────────

#[tokio::test]
async fn test_link_counters_accumulate_per_source() {
    let registry = fresh_registry().await;
    registry.add_channel("feed", None).await.unwrap();

    registry.record_links("feed", 4).await;
    registry.record_links("feed", 1).await;
    registry.record_links("unrelated", 2).await;

    assert_eq!(registry.link_count("feed").await, 5);
    assert_eq!(registry.link_count("unrelated").await, 2);
    assert_eq!(registry.link_count("never_seen").await, 0);
}

#[tokio::test]
async fn test_registry_state_survives_reload() {
    let backing: Arc<dyn StateStore> = Arc::new(MemoryStore::new());

    let registry = SourceRegistry::load(backing.clone()).await;
    registry.add_channel("feed", Some("ورزشی")).await.unwrap();
    registry.add_website("example.com", None).await.unwrap();
    registry.record_links("feed", 3).await;
    registry.touch_last_check().await;
    drop(registry);

    let reloaded = SourceRegistry::load(backing).await;
    assert_eq!(reloaded.channels().await, vec!["feed"]);
    assert_eq!(reloaded.websites().await, vec!["https://example.com"]);
    assert_eq!(reloaded.channel_category("feed").await.as_deref(), Some("ورزشی"));
    assert_eq!(reloaded.link_count("feed").await, 3);
    assert!(reloaded.last_check().await.is_some());
}
