//! Explain command: why a day looks the way it does.

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use compass_core::dates::format_day_key;
use compass_core::risk::as_percent;
use compass_core::{DayExplanation, DayForecast, explain_day};

use crate::cli::InputArgs;
use crate::commands::forecast::{Forecasted, prepare};
use crate::commands::util::print_json;
use crate::config::Config;

/// Formats the human-readable explanation of one day.
pub fn format_explanation(day: &DayForecast, explanation: &DayExplanation) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "DAY: {}", day.date.format("%A, %b %-d, %Y"))?;
    writeln!(
        output,
        "Risk: {} ({}% of {}h)",
        day.risk_level,
        as_percent(day.utilization),
        day.capacity_hours
    )?;
    writeln!(output)?;
    writeln!(output, "{}", explanation.summary)?;

    let breakdown = &explanation.breakdown;
    writeln!(output)?;
    writeln!(output, "BREAKDOWN")?;
    writeln!(output, "─────────")?;
    writeln!(
        output,
        "Meetings: {:>5.1}h ({}%)",
        breakdown.meeting_hours, breakdown.meeting_percent
    )?;
    writeln!(
        output,
        "Tasks:    {:>5.1}h ({}%)",
        breakdown.task_hours, breakdown.task_percent
    )?;
    writeln!(output, "Main driver: {}", explanation.main_driver.as_str())?;

    if !explanation.top_contributors.is_empty() {
        writeln!(output)?;
        writeln!(output, "TOP CONTRIBUTORS")?;
        writeln!(output, "────────────────")?;
        for contributor in &explanation.top_contributors {
            writeln!(
                output,
                "{:<7}  {:>5.1}h  {}",
                contributor.kind.as_str(),
                contributor.hours,
                contributor.title
            )?;
        }
    }

    if !explanation.patterns.is_empty() {
        writeln!(output)?;
        writeln!(output, "PATTERNS")?;
        writeln!(output, "────────")?;
        for pattern in &explanation.patterns {
            writeln!(output, "- {pattern}")?;
        }
    }

    if !day.suggested_actions.is_empty() {
        writeln!(output)?;
        writeln!(output, "SUGGESTED ACTIONS")?;
        writeln!(output, "─────────────────")?;
        for action in &day.suggested_actions {
            writeln!(output, "- {}", action.reason())?;
        }
    }

    Ok(output)
}

/// Runs the explain command.
pub fn run(date: NaiveDate, input: &InputArgs, json: bool, config: &Config) -> Result<()> {
    let Forecasted {
        request,
        capacity,
        forecast,
    } = prepare(input, config)?;

    let day = forecast.day(date).with_context(|| {
        format!(
            "{} is outside the forecast window {} to {}",
            format_day_key(date),
            format_day_key(forecast.summary.window_start),
            format_day_key(forecast.summary.window_end)
        )
    })?;
    let explanation = explain_day(day, &request.events, &request.tasks, capacity.timezone());

    if json {
        print_json(&explanation)
    } else {
        print!("{}", format_explanation(day, &explanation)?);
        Ok(())
    }
}
