//! Daemon initialization and runtime setup.
//!
//! Handles persistence selection, service loading, worker spawning, and
//! graceful shutdown.

use crate::application::services::{Coordinator, CredentialRotator, LinkStore, SourceRegistry};
use crate::config::Config;
use crate::infrastructure::collaborators::{
    LogNotifier, NullAccountGroupSource, NullMessageSource, NullPageFetcher,
};
use crate::infrastructure::persistence::{JsonFileStore, MemoryStore, StateStore};
use crate::scheduler::run_check_worker;
use crate::state::AppState;

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;

/// Runs the aggregation daemon with the given configuration.
///
/// Initializes:
/// - JSON file persistence (or in-memory when `ephemeral` is set)
/// - Link store, source registry, and credential rotator
/// - Coordinator with the configured collaborators
/// - Background check worker
///
/// With `once` set, runs a single check cycle and exits instead of staying
/// resident.
///
/// # Errors
///
/// Returns an error if the data directory cannot be prepared.
pub async fn run(config: Config, once: bool, ephemeral: bool) -> Result<()> {
    let store: Arc<dyn StateStore> = if ephemeral {
        tracing::info!("Persistence disabled (in-memory store)");
        Arc::new(MemoryStore::new())
    } else {
        let store = JsonFileStore::open(&config.data_dir)?;
        tracing::info!(dir = %config.data_dir.display(), "Persistence enabled (JSON files)");
        Arc::new(store)
    };

    let links = Arc::new(LinkStore::load(store.clone()).await);
    let registry = Arc::new(SourceRegistry::load(store.clone()).await);
    let rotator = Arc::new(CredentialRotator::load(store, config.primary_token.clone()).await);

    let coordinator = Arc::new(Coordinator::new(
        links.clone(),
        registry.clone(),
        rotator.clone(),
        Arc::new(NullMessageSource::new()),
        Arc::new(NullPageFetcher::new()),
        Arc::new(NullAccountGroupSource::new()),
        Arc::new(LogNotifier::new()),
        config.coordinator_settings(),
    ));

    let state = AppState::new(links, registry, rotator, coordinator);

    if once {
        let result = state.coordinator.check_cycle().await;
        tracing::info!(
            new_links = result.new_links,
            sources_checked = result.sources_checked,
            failed = result.errors.len(),
            "single check cycle done"
        );
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(run_check_worker(
        state.coordinator.clone(),
        config.check_interval(),
        shutdown_rx,
    ));
    tracing::info!("Check worker started");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    shutdown_tx.send(true)?;
    worker.await?;

    let status = state.coordinator.status().await;
    tracing::info!(
        total_links = status.total_links,
        new_links = status.new_links,
        "daemon stopped"
    );

    Ok(())
}
