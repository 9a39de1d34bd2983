use anyhow::Result;
use clap::Parser;
use linkharvest::config;
use tracing_subscriber::EnvFilter;

/// Multi-source Telegram link aggregation daemon.
#[derive(Debug, Parser)]
#[command(name = "linkharvest", version, about)]
struct Args {
    /// Directory for persisted JSON state (overrides LINKHARVEST_DATA_DIR).
    #[arg(long)]
    data_dir: Option<std::path::PathBuf>,

    /// Run a single check cycle and exit.
    #[arg(long)]
    once: bool,

    /// Keep all state in memory; nothing is written to disk.
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; real environment variables win.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = config::load_from_env()?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    init_tracing(&config.log_level, &config.log_format);
    config.print_summary();

    linkharvest::daemon::run(config, args.once, args.ephemeral).await
}

fn init_tracing(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    if log_format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
