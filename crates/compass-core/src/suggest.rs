//! Rebalancing suggestions for overloaded days.
//!
//! A greedy single pass: for each high or critical day, offer to move the
//! largest low-priority placement to the first earlier day that can absorb
//! it, or flag the day when nothing fits. Suggestions are advisory; they do
//! not change the allocation they were derived from.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::capacity::TaskAllocation;
use crate::dates;
use crate::forecast::DayForecast;
use crate::risk::RiskLevel;
use crate::types::{Priority, TaskId};

/// A proposed action attached to an overloaded day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SuggestedAction {
    /// Move some of a task's hours to an earlier day.
    MoveTask {
        task_id: TaskId,
        from_date: NaiveDate,
        to_date: NaiveDate,
        hours_to_move: f64,
        reason: String,
    },
    /// The day is overloaded and no earlier day can take the work.
    FlagOverflow { reason: String },
}

impl SuggestedAction {
    /// Human-readable explanation.
    pub fn reason(&self) -> &str {
        match self {
            Self::MoveTask { reason, .. } | Self::FlagOverflow { reason } => reason,
        }
    }

    pub const fn task_id(&self) -> Option<&TaskId> {
        match self {
            Self::MoveTask { task_id, .. } => Some(task_id),
            Self::FlagOverflow { .. } => None,
        }
    }
}

/// Attaches at most one suggestion to every overloaded day.
///
/// `days` must be chronological; "earlier" means earlier in that slice.
/// `placements` maps each day to the task slices allocated on it.
pub fn apply_suggestions(
    days: &mut [DayForecast],
    placements: &BTreeMap<NaiveDate, Vec<TaskAllocation>>,
) {
    for index in 0..days.len() {
        let (earlier, rest) = days.split_at_mut(index);
        let day = &mut rest[0];
        let allocations = placements.get(&day.date).map_or(&[][..], Vec::as_slice);

        if let Some(action) = suggest_for_day(day, allocations, earlier) {
            tracing::debug!(date = %day.date, ?action, "suggested action");
            day.suggested_actions.push(action);
        }
    }
}

/// Proposes an action for `day`, or `None` when the day is not overloaded.
pub fn suggest_for_day(
    day: &DayForecast,
    allocations: &[TaskAllocation],
    earlier: &[DayForecast],
) -> Option<SuggestedAction> {
    if !day.risk_level.is_overloaded() {
        return None;
    }

    let mut candidates: Vec<&TaskAllocation> = allocations
        .iter()
        .filter(|a| a.priority == Priority::Low)
        .collect();
    candidates.sort_by(|a, b| b.hours.total_cmp(&a.hours));

    for candidate in candidates {
        if let Some(destination) = find_earlier_day_with_capacity(earlier, candidate.hours) {
            return Some(SuggestedAction::MoveTask {
                task_id: candidate.task_id.clone(),
                from_date: day.date,
                to_date: destination.date,
                hours_to_move: candidate.hours,
                reason: format!(
                    "Move \"{}\" to {} to reduce overload",
                    candidate.title,
                    dates::format_day_key(destination.date)
                ),
            });
        }
    }

    let threshold = if day.risk_level == RiskLevel::Critical {
        "110%"
    } else {
        "90%"
    };
    Some(SuggestedAction::FlagOverflow {
        reason: format!("Day exceeds {threshold} utilization with no earlier capacity available"),
    })
}

/// First day in `earlier` that is low or medium risk and has at least
/// `hours` of raw spare capacity.
pub fn find_earlier_day_with_capacity(
    earlier: &[DayForecast],
    hours: f64,
) -> Option<&DayForecast> {
    earlier
        .iter()
        .find(|d| !d.risk_level.is_overloaded() && d.spare_hours() >= hours)
}
