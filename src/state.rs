use std::sync::Arc;

use crate::application::services::{Coordinator, CredentialRotator, LinkStore, SourceRegistry};

/// Shared handles to the loaded services.
#[derive(Clone)]
pub struct AppState {
    pub links: Arc<LinkStore>,
    pub registry: Arc<SourceRegistry>,
    pub rotator: Arc<CredentialRotator>,
    pub coordinator: Arc<Coordinator>,
}

impl AppState {
    pub fn new(
        links: Arc<LinkStore>,
        registry: Arc<SourceRegistry>,
        rotator: Arc<CredentialRotator>,
        coordinator: Arc<Coordinator>,
    ) -> Self {
        Self {
            links,
            registry,
            rotator,
            coordinator,
        }
    }
}
