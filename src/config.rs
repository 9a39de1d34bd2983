//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the daemon
//! starts.
//!
//! ## Optional Variables
//!
//! - `LINKHARVEST_DATA_DIR` - Directory for persisted JSON state (default: `./data`)
//! - `CHECK_INTERVAL_MINUTES` - Minutes between check cycles (default: 30)
//! - `BATCH_CAP` - Maximum sources visited per pass (default: 20)
//! - `PACING_MS` - Delay between sources in milliseconds (default: 1500)
//! - `MAX_MESSAGES` - Messages fetched per channel or group (default: 100)
//! - `SCROLL_COUNT` - Scroll iterations per website render (default: 5)
//! - `SOURCE_TIMEOUT_SECS` - Per-source time budget (default: 20)
//! - `AUTO_DISCOVER` - Enable directory source discovery (default: true)
//! - `TELEGRAM_BOT_TOKEN` - Primary bot token, fallback when the rotation pool is empty
//! - `NOTIFY_ENABLED` - Enable new-link notifications (default: false)
//! - `NOTIFY_DESTINATION` - Phone number notifications go to (required when enabled)
//! - `NOTIFY_MIN_LINKS` - New links per cycle before a notification fires (default: 5)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::services::CoordinatorSettings;

/// Daemon configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub check_interval_minutes: u64,
    pub batch_cap: usize,
    pub pacing_ms: u64,
    pub max_messages: usize,
    pub scroll_count: u32,
    pub source_timeout_secs: u64,
    pub auto_discover: bool,
    /// Primary bot token used whenever the rotation pool is empty.
    pub primary_token: Option<String>,
    pub notify_enabled: bool,
    pub notify_destination: Option<String>,
    pub notify_min_links: u64,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("LINKHARVEST_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let check_interval_minutes = env::var("CHECK_INTERVAL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let batch_cap = env::var("BATCH_CAP")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        let pacing_ms = env::var("PACING_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1500);

        let max_messages = env::var("MAX_MESSAGES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let scroll_count = env::var("SCROLL_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let source_timeout_secs = env::var("SOURCE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        let auto_discover = env::var("AUTO_DISCOVER")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(true);

        let primary_token = env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let notify_enabled = env::var("NOTIFY_ENABLED")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let notify_destination = env::var("NOTIFY_DESTINATION")
            .ok()
            .filter(|d| !d.trim().is_empty());

        let notify_min_links = env::var("NOTIFY_MIN_LINKS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            data_dir,
            check_interval_minutes,
            batch_cap,
            pacing_ms,
            max_messages,
            scroll_count,
            source_timeout_secs,
            auto_discover,
            primary_token,
            notify_enabled,
            notify_destination,
            notify_min_links,
            log_level,
            log_format,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `check_interval_minutes` or `batch_cap` is zero
    /// - `log_format` is not `text` or `json`
    /// - notifications are enabled without a destination
    pub fn validate(&self) -> Result<()> {
        if self.check_interval_minutes == 0 {
            anyhow::bail!("CHECK_INTERVAL_MINUTES must be at least 1");
        }

        if self.batch_cap == 0 {
            anyhow::bail!("BATCH_CAP must be at least 1");
        }

        if self.max_messages == 0 {
            anyhow::bail!("MAX_MESSAGES must be at least 1");
        }

        if self.source_timeout_secs == 0 {
            anyhow::bail!("SOURCE_TIMEOUT_SECS must be greater than 0");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if self.notify_enabled && self.notify_destination.is_none() {
            anyhow::bail!("NOTIFY_DESTINATION must be set when NOTIFY_ENABLED is true");
        }

        Ok(())
    }

    /// The coordinator settings this configuration describes.
    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            batch_cap: self.batch_cap,
            pacing: Duration::from_millis(self.pacing_ms),
            max_messages: self.max_messages,
            scroll_count: self.scroll_count,
            source_timeout: Duration::from_secs(self.source_timeout_secs),
            auto_discover: self.auto_discover,
            notify_enabled: self.notify_enabled,
            notify_destination: self.notify_destination.clone(),
            notify_min_links: self.notify_min_links,
        }
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_minutes * 60)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Data directory: {}", self.data_dir.display());
        tracing::info!("  Check interval: {} min", self.check_interval_minutes);
        tracing::info!("  Batch cap: {}", self.batch_cap);
        tracing::info!("  Pacing: {} ms", self.pacing_ms);
        tracing::info!("  Auto-discover: {}", self.auto_discover);

        match &self.primary_token {
            Some(token) => tracing::info!("  Primary token: {}", mask_secret(token)),
            None => tracing::info!("  Primary token: not set"),
        }

        if self.notify_enabled {
            let destination = self.notify_destination.as_deref().unwrap_or("");
            tracing::info!(
                "  Notifications: enabled, to {} at >= {} new links",
                mask_secret(destination),
                self.notify_min_links
            );
        } else {
            tracing::info!("  Notifications: disabled");
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks a secret for logging, keeping just enough to tell tokens apart.
///
/// `123456:ABC-secret` → `1234***`, anything shorter than five characters
/// masks entirely.
fn mask_secret(secret: &str) -> String {
    if secret.len() < 5 {
        "***".to_string()
    } else {
        format!("{}***", &secret[..4])
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
