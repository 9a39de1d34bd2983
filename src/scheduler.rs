//! Periodic check-cycle worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::application::services::Coordinator;

const SLEEP_SLICE: Duration = Duration::from_secs(1);

/// Runs check cycles forever, `interval` apart, until `shutdown` flips.
///
/// The wait between cycles is sliced into one-second sleeps so a shutdown
/// request takes effect within a second instead of after a full interval.
/// A cycle already in flight is allowed to finish; no new cycle starts after
/// shutdown is observed.
pub async fn run_check_worker(
    coordinator: Arc<Coordinator>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(interval_secs = interval.as_secs(), "check worker started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        let result = coordinator.check_cycle().await;
        if result.has_errors() {
            error!(
                failed = result.errors.len(),
                new_links = result.new_links,
                "check cycle finished with failures"
            );
        }

        let mut remaining = interval;
        while !remaining.is_zero() {
            if *shutdown.borrow() {
                info!("check worker stopping");
                return;
            }

            let slice = remaining.min(SLEEP_SLICE);
            tokio::select! {
                _ = tokio::time::sleep(slice) => {}
                _ = shutdown.changed() => {}
            }
            remaining = remaining.saturating_sub(slice);
        }
    }

    info!("check worker stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{
        CoordinatorSettings, CredentialRotator, LinkStore, SourceRegistry,
    };
    use crate::domain::collaborators::{
        MockAccountGroupSource, MockMessageSource, MockNotifier, MockPageFetcher,
    };
    use crate::infrastructure::persistence::MemoryStore;
    use std::collections::BTreeMap;

    async fn idle_coordinator() -> Arc<Coordinator> {
        let store = Arc::new(MemoryStore::new());
        let links = Arc::new(LinkStore::load(store.clone()).await);
        let registry = Arc::new(SourceRegistry::load(store.clone()).await);
        let rotator = Arc::new(CredentialRotator::load(store, None).await);

        let mut accounts = MockAccountGroupSource::new();
        accounts
            .expect_list_groups_and_recent_text()
            .returning(|_| Ok(BTreeMap::new()));

        Arc::new(Coordinator::new(
            links,
            registry,
            rotator,
            Arc::new(MockMessageSource::new()),
            Arc::new(MockPageFetcher::new()),
            Arc::new(accounts),
            Arc::new(MockNotifier::new()),
            CoordinatorSettings {
                pacing: Duration::ZERO,
                ..CoordinatorSettings::default()
            },
        ))
    }

    #[tokio::test]
    async fn test_worker_stops_on_shutdown() {
        let coordinator = idle_coordinator().await;
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(run_check_worker(
            coordinator,
            Duration::from_secs(3600),
            rx,
        ));

        // Let the first cycle run, then request shutdown.
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("worker did not stop after shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_worker_does_not_start_when_already_shut_down() {
        let coordinator = idle_coordinator().await;
        let (_tx, rx) = watch::channel(true);

        // Last-check is only stamped by a cycle; none should run.
        tokio::time::timeout(
            Duration::from_secs(5),
            run_check_worker(coordinator.clone(), Duration::from_secs(3600), rx),
        )
        .await
        .expect("worker did not observe shutdown");

        assert!(coordinator.status().await.last_check.is_none());
    }
}
