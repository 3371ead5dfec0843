//! Estimate command: suggest hours for a task title.

use anyhow::Result;
use compass_core::{Priority, estimate};
use serde::Serialize;

use crate::commands::util::print_json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateOutput<'a> {
    pub title: &'a str,
    pub priority: Priority,
    pub estimated_hours: f64,
    pub explanation: String,
}

pub fn build(title: &str, priority: Priority) -> EstimateOutput<'_> {
    let result = estimate(title, priority);
    EstimateOutput {
        title,
        priority,
        estimated_hours: result.estimated_hours,
        explanation: result.explanation,
    }
}

pub fn format_estimate(output: &EstimateOutput<'_>) -> String {
    format!("{:.1}h  {}\n", output.estimated_hours, output.explanation)
}

/// Runs the estimate command.
pub fn run(title: &str, priority: Priority, json: bool) -> Result<()> {
    let output = build(title, priority);
    if json {
        print_json(&output)
    } else {
        print!("{}", format_estimate(&output));
        Ok(())
    }
}
