use std::sync::Arc;

use linkharvest::application::services::CredentialRotator;
use linkharvest::infrastructure::persistence::{MemoryStore, StateStore};

// ─── ROTATION ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_every_pool_token_is_used_once_per_period() {
    let rotator = CredentialRotator::load(Arc::new(MemoryStore::new()), None).await;
    for token in ["t1", "t2", "t3"] {
        rotator.add_token(token).await;
    }

    let mut period = Vec::new();
    for _ in 0..3 {
        period.push(rotator.next_token().await.unwrap());
    }
    period.sort();

    assert_eq!(period, vec!["t1", "t2", "t3"]);
}

#[tokio::test]
async fn test_cursor_position_survives_reload() {
    let backing: Arc<dyn StateStore> = Arc::new(MemoryStore::new());

    let rotator = CredentialRotator::load(backing.clone(), None).await;
    rotator.add_token("t1").await;
    rotator.add_token("t2").await;
    rotator.add_token("t3").await;

    assert_eq!(rotator.next_token().await.as_deref(), Some("t1"));
    drop(rotator);

    // A restart resumes the rotation where it left off.
    let reloaded = CredentialRotator::load(backing, None).await;
    assert_eq!(reloaded.next_token().await.as_deref(), Some("t2"));
}

#[tokio::test]
async fn test_pool_removal_falls_back_to_primary() {
    let rotator =
        CredentialRotator::load(Arc::new(MemoryStore::new()), Some("primary".to_string())).await;
    rotator.add_token("only").await;

    assert_eq!(rotator.next_token().await.as_deref(), Some("only"));

    rotator.remove_token("only").await;
    assert_eq!(rotator.next_token().await.as_deref(), Some("primary"));
}
