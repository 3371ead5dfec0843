//! Short headline observations derived from a finished forecast.

use serde::{Deserialize, Serialize};

use crate::dates::weekday_name;
use crate::forecast::{DayForecast, ForecastResult};
use crate::risk::{RiskLevel, as_percent};

/// Most insights reported for one forecast.
pub const MAX_INSIGHTS: usize = 4;

/// Share above which meetings or tasks are said to dominate.
const DOMINANT_PERCENT: i64 = 60;

/// What an insight talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Risk,
    Meetings,
    Tasks,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub text: String,
    pub severity: Severity,
}

impl CapacityInsight {
    fn new(kind: InsightKind, severity: Severity, text: String) -> Self {
        Self {
            kind,
            text,
            severity,
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Rounds to one decimal with halves away from zero, so `{:.1}` never sees a tie.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn day_names(days: &[&DayForecast]) -> String {
    days.iter()
        .map(|d| weekday_name(d.date))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Summarizes a forecast in at most [`MAX_INSIGHTS`] lines, in order:
/// risk, meeting/task split, lightest and heaviest days, overflow.
pub fn generate_insights(forecast: &ForecastResult) -> Vec<CapacityInsight> {
    let mut insights = vec![risk_insight(&forecast.days)];
    insights.extend(split_insight(&forecast.days));
    insights.extend(extreme_day_insights(&forecast.days));

    if !forecast.overflow_tasks.is_empty() {
        let count = forecast.overflow_tasks.len();
        insights.push(CapacityInsight::new(
            InsightKind::Tasks,
            Severity::Critical,
            format!(
                "{count} task{} won't fit ({:.1}h overflow)",
                plural(count),
                round_tenth(forecast.overflow_hours())
            ),
        ));
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

fn risk_insight(days: &[DayForecast]) -> CapacityInsight {
    let at_level = |level: RiskLevel| -> Vec<&DayForecast> {
        days.iter().filter(|d| d.risk_level == level).collect()
    };

    let critical = at_level(RiskLevel::Critical);
    if !critical.is_empty() {
        return CapacityInsight::new(
            InsightKind::Risk,
            Severity::Critical,
            format!(
                "{} critical day{} detected: {}",
                critical.len(),
                plural(critical.len()),
                day_names(&critical)
            ),
        );
    }

    let high = at_level(RiskLevel::High);
    if !high.is_empty() {
        return CapacityInsight::new(
            InsightKind::Risk,
            Severity::Warning,
            format!(
                "{} high-risk day{}: {}",
                high.len(),
                plural(high.len()),
                day_names(&high)
            ),
        );
    }

    CapacityInsight::new(
        InsightKind::Risk,
        Severity::Info,
        "No critical days, your capacity looks healthy".to_string(),
    )
}

fn split_insight(days: &[DayForecast]) -> Option<CapacityInsight> {
    let meeting_hours: f64 = days.iter().map(|d| d.meeting_hours).sum();
    let task_hours: f64 = days.iter().map(|d| d.task_hours).sum();
    let total = meeting_hours + task_hours;
    if total <= 0.0 {
        return None;
    }

    let meeting_percent = as_percent(meeting_hours / total);
    let task_percent = as_percent(task_hours / total);

    let insight = if meeting_percent > DOMINANT_PERCENT {
        CapacityInsight::new(
            InsightKind::Meetings,
            Severity::Warning,
            format!("Meetings dominate your schedule at {meeting_percent}% of total time"),
        )
    } else if task_percent > DOMINANT_PERCENT {
        CapacityInsight::new(
            InsightKind::Tasks,
            Severity::Info,
            format!("Tasks drive most of your workload at {task_percent}% of total time"),
        )
    } else {
        CapacityInsight::new(
            InsightKind::Time,
            Severity::Info,
            format!("Balanced split: {meeting_percent}% meetings, {task_percent}% tasks"),
        )
    };
    Some(insight)
}

fn extreme_day_insights(days: &[DayForecast]) -> Vec<CapacityInsight> {
    let busy: Vec<&DayForecast> = days.iter().filter(|d| d.total_hours > 0.0).collect();
    let mut insights = Vec::new();

    // Ties resolve to the earliest day.
    let lightest = busy
        .iter()
        .copied()
        .reduce(|min, d| if d.utilization < min.utilization { d } else { min });
    let heaviest = busy
        .iter()
        .copied()
        .reduce(|max, d| if d.utilization > max.utilization { d } else { max });

    if let Some(day) = lightest.filter(|d| d.utilization < 0.5) {
        insights.push(CapacityInsight::new(
            InsightKind::Time,
            Severity::Info,
            format!(
                "{} is your lightest day at {}% utilization",
                weekday_name(day.date),
                as_percent(day.utilization)
            ),
        ));
    }

    if let Some(day) = heaviest.filter(|d| d.utilization > 0.9) {
        let severity = if day.utilization > 1.1 {
            Severity::Critical
        } else {
            Severity::Warning
        };
        insights.push(CapacityInsight::new(
            InsightKind::Time,
            severity,
            format!(
                "{} is your heaviest day at {}% capacity",
                weekday_name(day.date),
                as_percent(day.utilization)
            ),
        ));
    }

    insights
}
