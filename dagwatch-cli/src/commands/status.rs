//! Status command handlers

use anyhow::{Context, Result};
use colored::*;
use dagwatch_client::DagClient;
use dagwatch_core::domain::options::StatusGetOpts;

use crate::console::{
    colorize_dag_state, colorize_vertex_state, format_percent, print_counters, print_diagnostics,
};

/// Fetch and display the DAG status
pub async fn show_dag(client: &DagClient, opts: StatusGetOpts) -> Result<()> {
    let status = client
        .get_dag_status(opts)
        .await
        .context("Failed to fetch DAG status")?;

    println!("{}", "DAG Status:".bold());
    println!("  Application: {}", client.application_id().to_string().cyan());
    println!("  State:       {}", colorize_dag_state(status.state));
    if let Some(progress) = status.overall_progress() {
        println!("  Progress:    {}", format_percent(progress));
    }

    if !status.vertex_progress.is_empty() {
        println!("\n{}", "Vertices:".bold());
        for (name, progress) in &status.vertex_progress {
            println!("  {} {:<24} {}", "▸".cyan(), name, format_percent(*progress));
        }
    }

    if let Some(memory) = &status.memory_usage {
        println!(
            "\n{} {} / {} bytes",
            "AM memory:".bold(),
            memory.used_bytes,
            memory.max_bytes
        );
    }

    if let Some(counters) = &status.counters {
        print_counters(counters);
    }
    print_diagnostics(&status.diagnostics);

    Ok(())
}

/// Fetch and display one vertex's status
pub async fn show_vertex(client: &DagClient, name: &str, opts: StatusGetOpts) -> Result<()> {
    let status = client
        .get_vertex_status(name, opts)
        .await
        .with_context(|| format!("Failed to fetch status of vertex '{}'", name))?;

    println!("{}", "Vertex Status:".bold());
    println!("  Name:     {}", status.name.cyan());
    println!("  State:    {}", colorize_vertex_state(status.state));
    if let Some(progress) = status.progress {
        println!("  Progress: {}", format_percent(progress));
    }

    if let Some(counters) = &status.counters {
        print_counters(counters);
    }
    print_diagnostics(&status.diagnostics);

    Ok(())
}
