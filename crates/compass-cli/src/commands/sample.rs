//! Sample command: a realistic week of meetings and tasks.
//!
//! The payload is anchored at "today" so it can be piped straight into
//! `compass forecast`.

use anyhow::Result;
use chrono::NaiveDate;
use chrono_tz::Tz;
use compass_core::dates::{add_days, at_local_time};
use compass_core::{CalendarEvent, EventId, EventKind, Priority, Task, TaskId, ValidationError};
use serde::Serialize;

use crate::commands::util::{print_json, resolve_today};
use crate::config::Config;

/// A sample meeting: day offset, title, local start and end as (hour, minute).
type MeetingTemplate = (i64, &'static str, (u32, u32), (u32, u32));

const MEETINGS: [MeetingTemplate; 10] = [
    (0, "Daily Standup", (9, 0), (9, 30)),
    (0, "Sprint Planning", (14, 0), (16, 0)),
    (1, "Daily Standup", (9, 0), (9, 30)),
    (1, "Client Demo", (15, 0), (16, 30)),
    (2, "Daily Standup", (9, 0), (9, 30)),
    (2, "Architecture Review", (10, 0), (12, 0)),
    (2, "1-on-1 with Manager", (14, 0), (15, 0)),
    (3, "Daily Standup", (9, 0), (9, 30)),
    (3, "Team Retrospective", (16, 0), (17, 30)),
    (4, "Daily Standup", (9, 0), (9, 30)),
];

/// A sample task: title, due-day offset, estimated hours, priority.
type TaskTemplate = (&'static str, i64, f64, Priority);

const TASKS: [TaskTemplate; 7] = [
    ("Fix critical bug in payment flow", 1, 4.0, Priority::High),
    ("Implement user profile page", 3, 8.0, Priority::High),
    ("Write API documentation", 5, 6.0, Priority::Medium),
    ("Update dependencies", 6, 3.0, Priority::Low),
    ("Code review for team PRs", 2, 2.0, Priority::Medium),
    ("Refactor authentication module", 6, 10.0, Priority::Medium),
    ("Update README", 5, 1.0, Priority::Low),
];

#[derive(Debug, Serialize)]
pub struct SamplePayload {
    pub events: Vec<CalendarEvent>,
    pub tasks: Vec<Task>,
}

/// Builds the sample week starting at `today`, with meeting times local to `tz`.
///
/// Meetings whose local time does not exist (DST gaps) are left out.
pub fn build_sample(today: NaiveDate, tz: Tz) -> Result<SamplePayload, ValidationError> {
    let mut events = Vec::with_capacity(MEETINGS.len());
    for (index, (offset, title, (start_h, start_m), (end_h, end_m))) in
        MEETINGS.into_iter().enumerate()
    {
        let day = add_days(today, offset);
        let (Some(start), Some(end)) = (
            at_local_time(day, start_h, start_m, tz),
            at_local_time(day, end_h, end_m, tz),
        ) else {
            tracing::debug!(%day, title, "skipping sample meeting at a nonexistent local time");
            continue;
        };
        events.push(CalendarEvent {
            id: EventId::new(format!("e{}", index + 1))?,
            title: title.to_string(),
            start,
            end,
            kind: Some(EventKind::Meeting),
        });
    }

    let tasks = TASKS
        .into_iter()
        .enumerate()
        .map(|(index, (title, due_offset, hours, priority))| {
            Ok(Task {
                id: TaskId::new(format!("t{}", index + 1))?,
                title: title.to_string(),
                due_date: add_days(today, due_offset),
                estimated_hours: hours,
                priority,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(SamplePayload { events, tasks })
}

/// Runs the sample command.
pub fn run(today: Option<NaiveDate>, config: &Config) -> Result<()> {
    let capacity = compass_core::CapacityConfig::from_partial(&config.capacity_defaults())?;
    let tz = capacity.timezone();
    let payload = build_sample(resolve_today(today, tz), tz)?;
    print_json(&payload)
}
