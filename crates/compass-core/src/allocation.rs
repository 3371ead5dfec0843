//! Task allocation algorithm.
//!
//! Places task effort into the capacity left over by meetings.
//!
//! # Algorithm Summary
//!
//! 1. Build the capacity window `[today, today + window_days - 1]`
//! 2. Fold every event whose start day lies in the window in as meeting load
//! 3. Order tasks by priority (high first), then due date (earliest first)
//! 4. Walk each task backward from its due date (clamped into the window),
//!    taking `min(free, remaining)` from every day with free capacity
//! 5. Whatever is left once the walk passes `today` becomes overflow

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::capacity::CapacityWindow;
use crate::types::{CalendarEvent, CapacityConfig, Task, TaskId};

/// Task hours that did not fit anywhere in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowTask {
    pub task_id: TaskId,
    pub unallocated_hours: f64,
}

/// Result of the allocation pass.
#[derive(Debug, Clone)]
pub struct Allocation {
    /// Days loaded with meetings and task placements.
    pub window: CapacityWindow,

    /// Unplaced remainders, in allocation order.
    pub overflow: Vec<OverflowTask>,
}

/// Allocates tasks into the capacity window anchored at `today`.
///
/// Meeting hours are never displaced: tasks only consume what meetings leave
/// free. Tasks are assumed to have passed [`Task::validate`]; a negative or
/// NaN estimate places nothing and produces no overflow.
pub fn allocate(
    events: &[CalendarEvent],
    tasks: &[Task],
    config: &CapacityConfig,
    today: NaiveDate,
) -> Allocation {
    let mut window = CapacityWindow::new(today, config);
    fold_meetings(&mut window, events, config.timezone());

    let mut overflow = Vec::new();
    for task in allocation_order(tasks) {
        let remaining = place_backward(&mut window, task);
        if remaining > 0.0 {
            tracing::debug!(
                task_id = %task.id,
                unallocated_hours = remaining,
                "task overflows forecast window"
            );
            overflow.push(OverflowTask {
                task_id: task.id.clone(),
                unallocated_hours: remaining,
            });
        }
    }

    Allocation { window, overflow }
}

/// Books each event's duration on the day its start falls on in `tz`.
fn fold_meetings(window: &mut CapacityWindow, events: &[CalendarEvent], tz: Tz) {
    for event in events {
        let day = event.day(tz);
        if !window.add_meeting_load(day, event.duration_hours()) {
            tracing::trace!(event_id = %event.id, %day, "event outside forecast window");
        }
    }
}

/// Orders tasks for allocation: priority descending, then due date ascending.
///
/// The sort is stable, so ties keep their input order.
pub fn allocation_order(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.due_date.cmp(&b.due_date))
    });
    ordered
}

/// Places `task` backward from its clamped due date. Returns the hours left
/// unplaced.
///
/// A day with no free capacity still consumes a step; the walk ends once the
/// cursor moves before the window start.
fn place_backward(window: &mut CapacityWindow, task: &Task) -> f64 {
    let mut remaining = task.estimated_hours;
    let mut cursor = task.due_date.clamp(window.start(), window.end());

    while remaining > 0.0 && cursor >= window.start() {
        let free = window.free_hours(cursor);
        if free > 0.0 {
            let placed = free.min(remaining);
            window.add_task_load(cursor, task, placed);
            remaining -= placed;
        }

        let Some(previous) = cursor.pred_opt() else {
            break;
        };
        cursor = previous;
    }

    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventId, Priority};
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 25).unwrap()
    }

    fn day(offset: i64) -> NaiveDate {
        crate::dates::add_days(today(), offset)
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn event(id: &str, start: &str, end: &str) -> CalendarEvent {
        CalendarEvent {
            id: EventId::new(id).unwrap(),
            title: format!("Event {id}"),
            start: ts(start),
            end: ts(end),
            kind: None,
        }
    }

    fn task(id: &str, due: NaiveDate, hours: f64, priority: Priority) -> Task {
        Task {
            id: TaskId::new(id).unwrap(),
            title: format!("Task {id}"),
            due_date: due,
            estimated_hours: hours,
            priority,
        }
    }

    fn config(hours_per_day: f64, window_days: u32) -> CapacityConfig {
        CapacityConfig::new(hours_per_day, window_days, "UTC").unwrap()
    }

    fn task_hours_on(allocation: &Allocation, date: NaiveDate) -> f64 {
        allocation.window.get(date).map_or(0.0, |d| d.task_hours)
    }

    fn placed_for(allocation: &Allocation, task_id: &str) -> f64 {
        allocation
            .window
            .days()
            .flat_map(|d| d.allocations.iter())
            .filter(|a| a.task_id.as_str() == task_id)
            .map(|a| a.hours)
            .sum()
    }

    #[test]
    fn meetings_land_on_their_start_day() {
        let events = vec![
            event("e1", "2025-11-25T10:00:00Z", "2025-11-25T10:30:00Z"),
            event("e2", "2025-11-26T09:00:00Z", "2025-11-26T15:00:00Z"),
        ];
        let allocation = allocate(&events, &[], &config(8.0, 7), today());

        let first = allocation.window.get(day(0)).unwrap();
        assert!((first.meeting_hours - 0.5).abs() < 1e-9);
        let second = allocation.window.get(day(1)).unwrap();
        assert!((second.meeting_hours - 6.0).abs() < 1e-9);
        assert!((second.free_hours - 2.0).abs() < 1e-9);
    }

    #[test]
    fn meeting_spanning_midnight_counts_on_start_day() {
        let events = vec![event("e1", "2025-11-25T22:00:00Z", "2025-11-26T02:00:00Z")];
        let allocation = allocate(&events, &[], &config(8.0, 7), today());

        assert!((allocation.window.get(day(0)).unwrap().meeting_hours - 4.0).abs() < 1e-9);
        assert!(allocation.window.get(day(1)).unwrap().meeting_hours.abs() < 1e-9);
    }

    #[test]
    fn events_outside_window_are_ignored() {
        let events = vec![
            event("past", "2025-11-24T09:00:00Z", "2025-11-24T17:00:00Z"),
            event("future", "2025-12-02T09:00:00Z", "2025-12-02T17:00:00Z"),
        ];
        let allocation = allocate(&events, &[], &config(8.0, 7), today());
        assert!(allocation.window.days().all(|d| d.meeting_hours.abs() < 1e-9));
    }

    #[test]
    fn meeting_day_follows_configured_timezone() {
        // 23:30 UTC on the 25th is already the 26th in Berlin.
        let events = vec![event("late", "2025-11-25T23:30:00Z", "2025-11-26T00:30:00Z")];
        let berlin = CapacityConfig::new(8.0, 7, "Europe/Berlin").unwrap();
        let allocation = allocate(&events, &[], &berlin, today());

        assert!(allocation.window.get(day(0)).unwrap().meeting_hours.abs() < 1e-9);
        assert!((allocation.window.get(day(1)).unwrap().meeting_hours - 1.0).abs() < 1e-9);
    }

    #[test]
    fn negative_duration_event_adds_no_load() {
        let events = vec![event("bad", "2025-11-25T12:00:00Z", "2025-11-25T09:00:00Z")];
        let allocation = allocate(&events, &[], &config(8.0, 7), today());
        let first = allocation.window.get(day(0)).unwrap();
        assert!(first.meeting_hours.abs() < 1e-9);
        assert!((first.free_hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn task_fills_due_day_first_then_walks_backward() {
        let tasks = vec![task("big", day(4), 20.0, Priority::High)];
        let allocation = allocate(&[], &tasks, &config(8.0, 7), today());

        assert!((task_hours_on(&allocation, day(4)) - 8.0).abs() < 1e-9);
        assert!((task_hours_on(&allocation, day(3)) - 8.0).abs() < 1e-9);
        assert!((task_hours_on(&allocation, day(2)) - 4.0).abs() < 1e-9);
        assert!(task_hours_on(&allocation, day(5)).abs() < 1e-9);
        assert!(allocation.overflow.is_empty());
    }

    #[test]
    fn due_date_beyond_window_clamps_to_last_day() {
        let tasks = vec![task("later", day(30), 3.0, Priority::Medium)];
        let allocation = allocate(&[], &tasks, &config(8.0, 7), today());

        assert!((task_hours_on(&allocation, day(6)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn overdue_task_only_gets_today() {
        let tasks = vec![task("overdue", day(-3), 10.0, Priority::High)];
        let allocation = allocate(&[], &tasks, &config(8.0, 7), today());

        assert!((task_hours_on(&allocation, day(0)) - 8.0).abs() < 1e-9);
        assert!(task_hours_on(&allocation, day(1)).abs() < 1e-9);
        assert_eq!(allocation.overflow.len(), 1);
        assert_eq!(allocation.overflow[0].task_id.as_str(), "overdue");
        assert!((allocation.overflow[0].unallocated_hours - 2.0).abs() < 1e-9);
    }

    #[test]
    fn full_meeting_day_is_skipped_but_walk_continues() {
        let events = vec![event("allday", "2025-11-27T08:00:00Z", "2025-11-27T16:00:00Z")];
        let tasks = vec![task("t1", day(2), 3.0, Priority::Medium)];
        let allocation = allocate(&events, &tasks, &config(8.0, 7), today());

        assert!(task_hours_on(&allocation, day(2)).abs() < 1e-9);
        assert!((task_hours_on(&allocation, day(1)) - 3.0).abs() < 1e-9);
        assert!(allocation.overflow.is_empty());
    }

    #[test]
    fn overbooked_window_produces_overflow() {
        let events = vec![
            event("e1", "2025-11-25T09:00:00Z", "2025-11-25T13:00:00Z"),
            event("e2", "2025-11-26T09:00:00Z", "2025-11-26T13:00:00Z"),
            event("e3", "2025-11-27T09:00:00Z", "2025-11-27T13:00:00Z"),
        ];
        let tasks = vec![task("huge", day(2), 50.0, Priority::High)];
        let allocation = allocate(&events, &tasks, &config(8.0, 3), today());

        assert_eq!(allocation.overflow.len(), 1);
        assert_eq!(allocation.overflow[0].task_id.as_str(), "huge");
        assert!((allocation.overflow[0].unallocated_hours - 38.0).abs() < 1e-9);
    }

    #[test]
    fn zero_hour_task_places_nothing() {
        let tasks = vec![task("noop", day(0), 0.0, Priority::Low)];
        let allocation = allocate(&[], &tasks, &config(8.0, 7), today());

        assert!(allocation.overflow.is_empty());
        assert!(allocation.window.days().all(|d| d.allocations.is_empty()));
    }

    #[test]
    fn high_priority_preempts_low_priority_on_shared_due_day() {
        let tasks = vec![
            task("low", day(1), 8.0, Priority::Low),
            task("high", day(1), 8.0, Priority::High),
        ];
        let allocation = allocate(&[], &tasks, &config(8.0, 3), today());

        let due = allocation.window.get(day(1)).unwrap();
        assert_eq!(due.allocations.len(), 1);
        assert_eq!(due.allocations[0].task_id.as_str(), "high");
        assert!((due.allocations[0].hours - 8.0).abs() < 1e-9);

        // Low priority gets pushed back to today.
        let first = allocation.window.get(day(0)).unwrap();
        assert_eq!(first.allocations[0].task_id.as_str(), "low");
        assert!(allocation.overflow.is_empty());
    }

    #[test]
    fn priority_beats_earlier_due_date() {
        let tasks = vec![
            task("urgent-low", day(0), 8.0, Priority::Low),
            task("later-high", day(1), 16.0, Priority::High),
        ];
        let allocation = allocate(&[], &tasks, &config(8.0, 3), today());

        assert!((placed_for(&allocation, "later-high") - 16.0).abs() < 1e-9);
        assert_eq!(allocation.overflow.len(), 1);
        assert_eq!(allocation.overflow[0].task_id.as_str(), "urgent-low");
        assert!((allocation.overflow[0].unallocated_hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn allocation_order_is_priority_then_due_date_and_stable() {
        let tasks = vec![
            task("a", day(3), 1.0, Priority::Medium),
            task("b", day(1), 1.0, Priority::Low),
            task("c", day(3), 1.0, Priority::Medium),
            task("d", day(5), 1.0, Priority::High),
            task("e", day(1), 1.0, Priority::Medium),
        ];
        let ids: Vec<_> = allocation_order(&tasks)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["d", "e", "a", "c", "b"]);
    }

    #[test]
    fn identical_ties_allocate_in_input_order() {
        let tasks = vec![
            task("first", day(0), 6.0, Priority::Medium),
            task("second", day(0), 6.0, Priority::Medium),
        ];
        let allocation = allocate(&[], &tasks, &config(8.0, 7), today());

        assert!((placed_for(&allocation, "first") - 6.0).abs() < 1e-9);
        assert!((placed_for(&allocation, "second") - 2.0).abs() < 1e-9);
        assert_eq!(allocation.overflow[0].task_id.as_str(), "second");
    }

    fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Medium),
            Just(Priority::High)
        ]
    }

    proptest! {
        #[test]
        fn prop_hours_are_conserved(
            task_inputs in prop::collection::vec((-3i64..12, 0u32..40, arb_priority()), 0..12),
            meeting_quarters in prop::collection::vec(0u32..48, 7),
        ) {
            // Quarter-hour values keep f64 sums exact.
            let tasks: Vec<Task> = task_inputs
                .iter()
                .enumerate()
                .map(|(i, (offset, quarters, priority))| {
                    task(&format!("t{i}"), day(*offset), f64::from(*quarters) / 4.0, *priority)
                })
                .collect();
            let events: Vec<CalendarEvent> = meeting_quarters
                .iter()
                .enumerate()
                .map(|(i, quarters)| {
                    let start = day(i64::try_from(i).unwrap())
                        .and_hms_opt(8, 0, 0)
                        .unwrap()
                        .and_utc();
                    CalendarEvent {
                        id: EventId::new(format!("e{i}")).unwrap(),
                        title: "Meeting".to_string(),
                        start,
                        end: start + chrono::Duration::minutes(i64::from(*quarters) * 15),
                        kind: None,
                    }
                })
                .collect();

            let allocation = allocate(&events, &tasks, &config(8.0, 7), today());

            let placed: f64 = allocation.window.days().map(|d| d.task_hours).sum();
            let overflow: f64 = allocation.overflow.iter().map(|o| o.unallocated_hours).sum();
            let demand: f64 = tasks.iter().map(|t| t.estimated_hours).sum();
            prop_assert!((placed + overflow - demand).abs() < 1e-9);

            for t in &tasks {
                let unplaced = allocation
                    .overflow
                    .iter()
                    .find(|o| o.task_id == t.id)
                    .map_or(0.0, |o| o.unallocated_hours);
                let placed = placed_for(&allocation, t.id.as_str());
                prop_assert!((placed + unplaced - t.estimated_hours).abs() < 1e-9);
            }

            // Meetings are never displaced by task pressure.
            for (i, quarters) in meeting_quarters.iter().enumerate() {
                let d = allocation.window.get(day(i64::try_from(i).unwrap())).unwrap();
                prop_assert!((d.meeting_hours - f64::from(*quarters) / 4.0).abs() < 1e-9);
                prop_assert!(d.free_hours >= 0.0);
                prop_assert!(d.task_hours <= (d.capacity_hours - d.meeting_hours).max(0.0) + 1e-9);
            }
        }
    }
}
