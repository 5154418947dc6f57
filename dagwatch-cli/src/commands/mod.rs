//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod kill;
mod report;
mod status;
mod wait;

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use dagwatch_core::domain::options::StatusGetOpts;

use crate::config::Config;
use crate::console::ConsoleSink;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the current DAG status
    Status {
        /// Include counters
        #[arg(long)]
        counters: bool,
    },
    /// Show the current status of one vertex
    Vertex {
        /// Vertex name
        name: String,

        /// Include counters
        #[arg(long)]
        counters: bool,
    },
    /// Ask the application master to kill the DAG
    Kill,
    /// Wait for the DAG to finish, printing progress as it changes
    Wait {
        /// Vertex to print progress for (repeatable)
        #[arg(long = "vertex", conflicts_with = "all")]
        vertices: Vec<String>,

        /// Print progress for every vertex
        #[arg(long)]
        all: bool,

        /// Include counters in every poll
        #[arg(long)]
        counters: bool,
    },
    /// Show the cached application report from the resource manager
    Report,
}

/// Status options for a `--counters` flag
fn status_opts(counters: bool) -> StatusGetOpts {
    if counters {
        StatusGetOpts::GET_COUNTERS
    } else {
        StatusGetOpts::empty()
    }
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module. The client is closed
/// once the handler returns, whatever the outcome.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = config.client()?.with_sink(Arc::new(ConsoleSink));

    let result = match command {
        Commands::Status { counters } => status::show_dag(&client, status_opts(counters)).await,
        Commands::Vertex { name, counters } => {
            status::show_vertex(&client, &name, status_opts(counters)).await
        }
        Commands::Kill => kill::kill_dag(&client).await,
        Commands::Wait {
            vertices,
            all,
            counters,
        } => wait::wait_for_dag(&client, vertices, all, status_opts(counters)).await,
        Commands::Report => report::show_report(&client).await,
    };

    client.close();
    result
}
