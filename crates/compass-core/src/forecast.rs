//! Forecast assembly: the public entry point of the engine.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::allocation::{Allocation, OverflowTask, allocate};
use crate::capacity::DayCapacity;
use crate::risk::{RiskLevel, overall_risk};
use crate::suggest::{SuggestedAction, apply_suggestions};
use crate::types::{CalendarEvent, CapacityConfig, Task};

/// Final load and risk for one day of the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    pub date: NaiveDate,
    pub capacity_hours: f64,
    pub meeting_hours: f64,
    pub task_hours: f64,
    /// `meeting_hours + task_hours`.
    pub total_hours: f64,
    /// `total_hours / capacity_hours`; above 1.0 means overbooked.
    pub utilization: f64,
    pub risk_level: RiskLevel,
    pub suggested_actions: Vec<SuggestedAction>,
}

impl DayForecast {
    fn from_capacity(day: &DayCapacity) -> Self {
        let total_hours = day.total_hours();
        let utilization = total_hours / day.capacity_hours;
        Self {
            date: day.date,
            capacity_hours: day.capacity_hours,
            meeting_hours: day.meeting_hours,
            task_hours: day.task_hours,
            total_hours,
            utilization,
            risk_level: RiskLevel::from_utilization(utilization),
            suggested_actions: Vec::new(),
        }
    }

    /// Raw spare capacity; negative on overbooked days.
    pub fn spare_hours(&self) -> f64 {
        self.capacity_hours - self.total_hours
    }
}

/// Window-level overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub overall_risk: RiskLevel,
    pub critical_days: Vec<NaiveDate>,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

/// Everything downstream consumers get from a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub summary: ForecastSummary,
    /// One entry per window day, chronological.
    pub days: Vec<DayForecast>,
    pub overflow_tasks: Vec<OverflowTask>,
}

impl ForecastResult {
    pub fn day(&self, date: NaiveDate) -> Option<&DayForecast> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Task hours placed across the whole window.
    pub fn allocated_task_hours(&self) -> f64 {
        self.days.iter().map(|d| d.task_hours).sum()
    }

    /// Task hours that did not fit.
    pub fn overflow_hours(&self) -> f64 {
        self.overflow_tasks.iter().map(|o| o.unallocated_hours).sum()
    }
}

/// Generates a forecast for the window starting at `today`.
///
/// Deterministic: identical inputs and `today` give identical results.
pub fn generate_forecast(
    events: &[CalendarEvent],
    tasks: &[Task],
    config: &CapacityConfig,
    today: NaiveDate,
) -> ForecastResult {
    let Allocation { window, overflow } = allocate(events, tasks, config, today);
    let (window_start, window_end) = (window.start(), window.end());

    let mut days = Vec::with_capacity(window.len());
    let mut placements = BTreeMap::new();
    for capacity in window.into_days() {
        days.push(DayForecast::from_capacity(&capacity));
        placements.insert(capacity.date, capacity.allocations);
    }

    apply_suggestions(&mut days, &placements);
    let summary = build_summary(&days, window_start, window_end);

    tracing::debug!(
        overall_risk = %summary.overall_risk,
        critical_days = summary.critical_days.len(),
        overflow_tasks = overflow.len(),
        "forecast generated"
    );

    ForecastResult {
        summary,
        days,
        overflow_tasks: overflow,
    }
}

/// Aggregates chronological days into the window summary.
pub fn build_summary(
    days: &[DayForecast],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> ForecastSummary {
    ForecastSummary {
        overall_risk: overall_risk(days.iter().map(|d| d.risk_level)),
        critical_days: days
            .iter()
            .filter(|d| d.risk_level == RiskLevel::Critical)
            .map(|d| d.date)
            .collect(),
        window_start,
        window_end,
    }
}
