//! # LinkHarvest
//!
//! A multi-source Telegram link aggregation daemon: collects group and
//! channel links from monitored channels, crawled websites, and user-account
//! group feeds, deduplicates them into one normalized history, and files each
//! link under a keyword-based category.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer
//! separation:
//!
//! - **Domain Layer** ([`domain`]) - Link normalization, extraction,
//!   classification, discovery, and collaborator traits
//! - **Application Layer** ([`application`]) - Link store, source registry,
//!   credential rotation, and cycle coordination
//! - **Infrastructure Layer** ([`infrastructure`]) - JSON file persistence
//!   and no-op collaborator implementations
//!
//! Real transports (bot API, headless rendering, user-account sessions, SMS
//! delivery) plug in through the [`domain::collaborators`] traits.
//!
//! ## Quick Start
//!
//! ```bash
//! # Optional environment variables
//! export LINKHARVEST_DATA_DIR="./data"
//! export TELEGRAM_BOT_TOKEN="123456:your-token"
//! export CHECK_INTERVAL_MINUTES="30"
//!
//! # Start the daemon
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Daemon configuration is loaded from environment variables via
//! [`config::Config`]. See [`config`] module for available options.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod daemon;
pub mod scheduler;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        Coordinator, CoordinatorSettings, CredentialRotator, LinkStore, SourceRegistry,
    };
    pub use crate::domain::entities::{CheckCycleResult, LinkRecord};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
