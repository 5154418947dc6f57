//! Kill command handler

use anyhow::{Context, Result};
use colored::*;
use dagwatch_client::DagClient;

/// Send a kill request; does not wait for the DAG to stop
pub async fn kill_dag(client: &DagClient) -> Result<()> {
    client
        .try_kill_dag()
        .await
        .context("Failed to send kill request")?;

    println!(
        "{} Kill requested for {}",
        "✓".green(),
        client.application_id().to_string().cyan()
    );
    println!("{}", "  The DAG may keep running until the application master stops it.".dimmed());

    Ok(())
}
