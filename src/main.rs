//! jobfill - job application autofill over the Chrome DevTools Protocol.

mod app;
mod cli;
mod cmd_fill;
mod cmd_inspect;
mod notifier;
mod outcome_store;

use clap::Parser;
use jobfill_config::ConfigLoader;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::cli::{Cli, Commands};

/// Console plus daily-rotated file logs under `~/.jobfill/logs`.
fn init_tracing() -> anyhow::Result<()> {
    let log_dir = ConfigLoader::home_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("jobfill")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the background writer alive for the whole process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let app = App::load(cli.config)?;
    tracing::debug!("Using config {}", app.config_path.display());

    match cli.command {
        Commands::Run { url, json } => cmd_fill::run(&app, url, json).await,
        Commands::Watch { url } => cmd_fill::watch(&app, url).await,
        Commands::Scan { url } => cmd_inspect::scan(&app, url).await,
        Commands::Check => cmd_inspect::check(&app),
    }
}
