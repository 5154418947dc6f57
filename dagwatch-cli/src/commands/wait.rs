//! Wait command handler

use anyhow::{Context, Result};
use colored::*;
use dagwatch_client::DagClient;
use dagwatch_core::domain::options::StatusGetOpts;
use dagwatch_core::domain::status::DagState;

use crate::console::{colorize_dag_state, print_counters, print_diagnostics};

/// Wait for the DAG to finish; fails unless it succeeded
pub async fn wait_for_dag(
    client: &DagClient,
    vertices: Vec<String>,
    all: bool,
    opts: StatusGetOpts,
) -> Result<()> {
    println!(
        "{}",
        format!("Waiting for DAG in {}...", client.application_id()).bold()
    );

    let result = if all {
        client.wait_for_completion_with_all_status_updates(Some(opts)).await
    } else if vertices.is_empty() {
        client
            .wait_for_completion_with_status_updates(None, Some(opts))
            .await
    } else {
        let names: Vec<&str> = vertices.iter().map(String::as_str).collect();
        client
            .wait_for_completion_with_status_updates(Some(names.as_slice()), Some(opts))
            .await
    };
    let status = result.context("Failed while waiting for DAG completion")?;

    println!();
    println!("DAG finished: {}", colorize_dag_state(status.state));
    if let Some(url) = client.web_ui_address() {
        println!("  Tracking URL: {}", url.dimmed());
    }

    if let Some(counters) = &status.counters {
        print_counters(counters);
    }
    print_diagnostics(&status.diagnostics);

    if status.state != DagState::Succeeded {
        anyhow::bail!("DAG finished in state {}", status.state);
    }

    Ok(())
}
