pub mod coordinator;
pub mod credential_rotator;
pub mod link_store;
pub mod source_registry;

pub use coordinator::{Coordinator, CoordinatorSettings, StatusSnapshot};
pub use credential_rotator::CredentialRotator;
pub use link_store::{AddOutcome, LinkStore};
pub use source_registry::SourceRegistry;
