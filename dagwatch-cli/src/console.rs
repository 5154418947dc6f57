//! Console output helpers

use colored::*;
use dagwatch_client::ProgressSink;
use dagwatch_core::domain::status::{Counters, DagState, VertexState};

/// Prints progress lines to stdout, highlighting the state word
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn emit(&self, line: &str) {
        if line.starts_with("DAG:") {
            println!("{}", line.bold());
        } else {
            println!("{}", line.dimmed());
        }
    }
}

/// Colorize DAG state for display
pub fn colorize_dag_state(state: DagState) -> ColoredString {
    let text = state.as_str();
    match state {
        DagState::Submitted | DagState::Initing => text.yellow(),
        DagState::Running => text.cyan(),
        DagState::Succeeded => text.green(),
        DagState::Failed | DagState::Error => text.red(),
        DagState::Killed => text.dimmed(),
    }
}

/// Colorize vertex state for display
pub fn colorize_vertex_state(state: VertexState) -> ColoredString {
    let text = state.as_str();
    match state {
        VertexState::NotStarted => text.dimmed(),
        VertexState::Submitted | VertexState::Initing => text.yellow(),
        VertexState::Running => text.cyan(),
        VertexState::Succeeded => text.green(),
        VertexState::Failed | VertexState::Error => text.red(),
        VertexState::Killed => text.dimmed(),
    }
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

pub fn print_counters(counters: &Counters) {
    if counters.is_empty() {
        return;
    }
    println!("\n{}", "Counters:".bold());
    for (group, values) in counters.groups() {
        println!("  {}", group.cyan());
        for (name, value) in values {
            println!("    {} = {}", name, value);
        }
    }
}

pub fn print_diagnostics(diagnostics: &[String]) {
    if diagnostics.is_empty() {
        return;
    }
    println!("\n{}", "Diagnostics:".bold());
    for line in diagnostics {
        println!("  {}", line.red());
    }
}
