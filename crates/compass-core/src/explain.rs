//! Drill-down explanation of a single forecast day.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::forecast::DayForecast;
use crate::risk::as_percent;
use crate::types::{CalendarEvent, Task};

/// Contributors listed per day.
pub const MAX_CONTRIBUTORS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainDriver {
    Meetings,
    Tasks,
    Balanced,
}

impl MainDriver {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meetings => "meetings",
            Self::Tasks => "tasks",
            Self::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributorKind {
    Meeting,
    Task,
}

impl ContributorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Task => "task",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    #[serde(rename = "type")]
    pub kind: ContributorKind,
    pub title: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBreakdown {
    pub meeting_hours: f64,
    pub task_hours: f64,
    pub meeting_percent: i64,
    pub task_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayExplanation {
    pub summary: String,
    pub breakdown: LoadBreakdown,
    pub main_driver: MainDriver,
    pub top_contributors: Vec<Contributor>,
    pub patterns: Vec<String>,
}

/// Explains what fills `day`.
///
/// Contributors are the meetings starting on the day (bucketed in `tz`) and
/// the tasks due on it, largest first. Task hours are full estimates, not the
/// slices the allocator placed on this day.
pub fn explain_day(
    day: &DayForecast,
    events: &[CalendarEvent],
    tasks: &[Task],
    tz: Tz,
) -> DayExplanation {
    let (meeting_percent, task_percent) = if day.total_hours > 0.0 {
        (
            as_percent(day.meeting_hours / day.total_hours),
            as_percent(day.task_hours / day.total_hours),
        )
    } else {
        (0, 0)
    };

    let main_driver = if meeting_percent > 60 {
        MainDriver::Meetings
    } else if task_percent > 60 {
        MainDriver::Tasks
    } else {
        MainDriver::Balanced
    };

    let day_events: Vec<&CalendarEvent> =
        events.iter().filter(|e| e.day(tz) == day.date).collect();
    let day_tasks: Vec<&Task> = tasks.iter().filter(|t| t.due_date == day.date).collect();

    let mut contributors: Vec<Contributor> = day_events
        .iter()
        .map(|e| Contributor {
            kind: ContributorKind::Meeting,
            title: e.title.clone(),
            hours: e.duration_hours(),
        })
        .chain(day_tasks.iter().map(|t| Contributor {
            kind: ContributorKind::Task,
            title: t.title.clone(),
            hours: t.estimated_hours,
        }))
        .collect();
    contributors.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    contributors.truncate(MAX_CONTRIBUTORS);

    let mut patterns = Vec::new();
    if main_driver == MainDriver::Meetings && meeting_percent > 70 {
        patterns.push(format!(
            "Meetings occupy {meeting_percent}% of your time, leaving little room for focus work"
        ));
    }
    if main_driver == MainDriver::Tasks && task_percent > 70 {
        patterns.push(format!("Task work dominates this day at {task_percent}% of total time"));
    }
    if day_tasks.len() > 3 {
        patterns.push(format!(
            "Multiple tasks ({}) are due on this day, creating a deadline cluster",
            day_tasks.len()
        ));
    }
    let long_meetings = day_events
        .iter()
        .filter(|e| e.duration_hours() >= 2.0)
        .count();
    if long_meetings > 0 {
        patterns.push(format!(
            "{long_meetings} meeting{} longer than 2 hours",
            if long_meetings == 1 { "" } else { "s" }
        ));
    }
    if day.utilization > 1.0 && day.suggested_actions.is_empty() {
        patterns.push("No earlier days have capacity to absorb overflow work".to_string());
    }

    DayExplanation {
        summary: summarize(day),
        breakdown: LoadBreakdown {
            meeting_hours: day.meeting_hours,
            task_hours: day.task_hours,
            meeting_percent,
            task_percent,
        },
        main_driver,
        top_contributors: contributors,
        patterns,
    }
}

fn summarize(day: &DayForecast) -> String {
    let percent = as_percent(day.utilization);
    let (meetings, tasks) = (day.meeting_hours, day.task_hours);

    if day.utilization > 1.1 {
        format!(
            "This day is critically overloaded at {percent}% of capacity. \
             You have {meetings:.1}h of meetings and {tasks:.1}h of tasks, \
             exceeding your {}h capacity by {:.1}h.",
            day.capacity_hours,
            day.total_hours - day.capacity_hours
        )
    } else if day.utilization > 0.9 {
        format!(
            "This day is near capacity at {percent}% utilization. \
             With {meetings:.1}h of meetings and {tasks:.1}h of tasks, \
             you have minimal buffer for unexpected work."
        )
    } else if day.utilization > 0.7 {
        format!(
            "This day is moderately busy at {percent}% capacity. \
             You have {meetings:.1}h of meetings and {tasks:.1}h of tasks scheduled."
        )
    } else if day.utilization > 0.0 {
        format!(
            "This day is comfortably within capacity at {percent}% utilization. \
             You have {meetings:.1}h of meetings and {tasks:.1}h of tasks."
        )
    } else {
        "This day has no scheduled work. Consider using this time for planning or deep focus work."
            .to_string()
    }
}
