//! Application report command handler

use anyhow::Result;
use colored::*;
use dagwatch_client::DagClient;

/// Refresh and display the application report
///
/// A failed refresh is not an error; whatever is cached is shown instead.
pub async fn show_report(client: &DagClient) -> Result<()> {
    let Some(report) = client.refresh_application_report().await else {
        println!(
            "{}",
            format!("No application report available for {}.", client.application_id()).yellow()
        );
        return Ok(());
    };

    println!("{}", "Application Report:".bold());
    println!("  ID:           {}", report.application_id.to_string().cyan());
    println!("  State:        {:?}", report.state);
    println!("  Final Status: {:?}", report.final_status);
    if let Some(host) = &report.host {
        println!("  AM Host:      {}", host);
    }
    if let Some(url) = &report.tracking_url {
        println!("  Tracking URL: {}", url.dimmed());
    }
    if let Some(started) = report.start_time {
        println!("  Started:      {}", started.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(finished) = report.finish_time {
        println!("  Finished:     {}", finished.format("%Y-%m-%d %H:%M:%S"));
        if let Some(started) = report.start_time {
            let seconds = finished.signed_duration_since(started).num_seconds();
            println!("  Duration:     {}s", seconds);
        }
    }
    if let Some(diagnostics) = &report.diagnostics {
        println!("\n{}", "Diagnostics:".bold());
        println!("{}", diagnostics.red());
    }

    Ok(())
}
