//! Dagwatch CLI
//!
//! Command-line interface for watching and controlling a DAG running in a
//! remote application master.

mod commands;
mod config;
mod console;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use dagwatch_client::MonitorConfig;
use dagwatch_core::domain::application::ApplicationId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dagwatch")]
#[command(about = "Watch and control a running DAG", long_about = None)]
struct Cli {
    /// Application master URL
    #[arg(long, env = "DAGWATCH_AM_URL")]
    am_url: String,

    /// Resource manager URL, used for the application report
    #[arg(long, env = "DAGWATCH_RM_URL")]
    rm_url: Option<String>,

    /// Application id, e.g. application_1700000000000_0001
    #[arg(long, env = "DAGWATCH_APP_ID")]
    app_id: String,

    /// Timeout for a single request to either service
    #[arg(long, env = "DAGWATCH_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so progress on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dagwatch=warn,dagwatch_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let application_id: ApplicationId = cli
        .app_id
        .parse()
        .context("Invalid --app-id")?;

    let config = Config::new(
        cli.am_url,
        cli.rm_url,
        application_id,
        cli.request_timeout_secs,
        MonitorConfig::from_env(),
    );
    config.validate()?;

    handle_command(cli.command, &config).await
}
