//! Collaborator implementations owned by this crate.
//!
//! Real transports (bot API, headless rendering, user-account sessions, SMS)
//! live in their own crates and plug in through the traits in
//! [`crate::domain::collaborators`]. Only the disabled/no-op forms live here.

mod null;

pub use null::{LogNotifier, NullAccountGroupSource, NullMessageSource, NullPageFetcher};
