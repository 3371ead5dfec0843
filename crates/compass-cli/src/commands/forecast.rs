//! Forecast command.
//!
//! This module implements `compass forecast` with human-readable and JSON
//! output.

use std::fmt::Write;

use anyhow::Result;
use compass_core::dates::format_day_key;
use compass_core::risk::as_percent;
use compass_core::{
    CapacityConfig, CapacityInsight, ForecastResult, SuggestedAction, generate_forecast,
    generate_insights,
};

use crate::cli::InputArgs;
use crate::commands::util::{print_json, progress_bar, read_input, resolve_today};
use crate::config::Config;
use crate::request::ForecastRequest;

/// A parsed request together with the forecast computed from it.
#[derive(Debug)]
pub struct Forecasted {
    pub request: ForecastRequest,
    pub capacity: CapacityConfig,
    pub forecast: ForecastResult,
}

/// Reads the payload, resolves config and "today", and runs the engine.
pub fn prepare(input: &InputArgs, config: &Config) -> Result<Forecasted> {
    let payload = read_input(input.input.as_deref())?;
    let request = ForecastRequest::parse(&payload)?;
    let capacity = request.capacity_config(config.capacity_defaults())?;
    let today = resolve_today(input.today, capacity.timezone());

    let forecast = generate_forecast(&request.events, &request.tasks, &capacity, today);
    Ok(Forecasted {
        request,
        capacity,
        forecast,
    })
}

// ========== Text Output ==========

fn write_section(output: &mut String, title: &str) -> std::fmt::Result {
    writeln!(output)?;
    writeln!(output, "{title}")?;
    writeln!(output, "{}", "─".repeat(title.chars().count()))
}

/// Formats the human-readable forecast.
pub fn format_forecast(forecast: &ForecastResult, insights: &[CapacityInsight]) -> Result<String> {
    let mut output = String::new();
    let summary = &forecast.summary;

    writeln!(
        output,
        "CAPACITY FORECAST: {} to {}",
        format_day_key(summary.window_start),
        format_day_key(summary.window_end)
    )?;
    writeln!(output, "Overall risk: {}", summary.overall_risk)?;

    write_section(&mut output, "DAYS")?;
    for day in &forecast.days {
        writeln!(
            output,
            "{}  {}  {}  {:>4}%  {:<8}  {:>4.1}h meetings  {:>4.1}h tasks",
            format_day_key(day.date),
            day.date.format("%a"),
            progress_bar(day.utilization),
            as_percent(day.utilization),
            day.risk_level.as_str(),
            day.meeting_hours,
            day.task_hours,
        )?;
    }

    write_section(&mut output, "SUGGESTED ACTIONS")?;
    let mut any_action = false;
    for day in &forecast.days {
        for action in &day.suggested_actions {
            any_action = true;
            match action {
                SuggestedAction::MoveTask {
                    task_id,
                    hours_to_move,
                    reason,
                    ..
                } => writeln!(
                    output,
                    "{}  {reason} ({task_id}, {hours_to_move:.1}h)",
                    format_day_key(day.date)
                )?,
                SuggestedAction::FlagOverflow { reason } => {
                    writeln!(output, "{}  {reason}", format_day_key(day.date))?;
                }
            }
        }
    }
    if !any_action {
        writeln!(output, "(none)")?;
    }

    if !forecast.overflow_tasks.is_empty() {
        write_section(&mut output, "OVERFLOW")?;
        for overflow in &forecast.overflow_tasks {
            writeln!(
                output,
                "{}  {:.1}h unallocated",
                overflow.task_id, overflow.unallocated_hours
            )?;
        }
    }

    if !insights.is_empty() {
        write_section(&mut output, "INSIGHTS")?;
        for insight in insights {
            writeln!(output, "[{}] {}", insight.severity.as_str(), insight.text)?;
        }
    }

    Ok(output)
}

// ========== Public Interface ==========

/// Runs the forecast command.
pub fn run(input: &InputArgs, json: bool, config: &Config) -> Result<()> {
    let Forecasted { forecast, .. } = prepare(input, config)?;

    if json {
        print_json(&forecast)
    } else {
        let insights = generate_insights(&forecast);
        print!("{}", format_forecast(&forecast, &insights)?);
        Ok(())
    }
}
