//! Persistence backends for service state.

mod json_store;
mod memory_store;
mod store;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use store::StateStore;

#[cfg(test)]
pub use store::MockStateStore;
