//! Per-day capacity accumulators for the forecast window.
//!
//! A [`CapacityWindow`] is the mutable intermediate of a forecast: built
//! empty, loaded with meetings and then tasks by the allocation pass, and
//! finally consumed into chronological [`DayCapacity`] values.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::types::{CapacityConfig, Priority, Task, TaskId};

/// A slice of one task's hours placed on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAllocation {
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub hours: f64,
    pub priority: Priority,
    pub title: String,
}

/// Load accumulated on a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCapacity {
    pub date: NaiveDate,
    pub capacity_hours: f64,
    pub meeting_hours: f64,
    pub task_hours: f64,
    /// Hours still available for tasks. Meetings are booked first, so this
    /// can reach zero before any task is placed.
    pub free_hours: f64,
    /// Placements in the order they were made.
    pub allocations: Vec<TaskAllocation>,
}

impl DayCapacity {
    fn empty(date: NaiveDate, capacity_hours: f64) -> Self {
        Self {
            date,
            capacity_hours,
            meeting_hours: 0.0,
            task_hours: 0.0,
            free_hours: capacity_hours,
            allocations: Vec::new(),
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.meeting_hours + self.task_hours
    }
}

/// Day accumulators keyed by date, covering `[start, end]` inclusive.
///
/// Backed by a `BTreeMap` so iteration is always chronological.
#[derive(Debug, Clone)]
pub struct CapacityWindow {
    start: NaiveDate,
    end: NaiveDate,
    days: BTreeMap<NaiveDate, DayCapacity>,
}

impl CapacityWindow {
    /// Creates `config.window_days()` empty days starting at `today`.
    pub fn new(today: NaiveDate, config: &CapacityConfig) -> Self {
        let days: BTreeMap<_, _> = (0..i64::from(config.window_days()))
            .map(|offset| {
                let date = dates::add_days(today, offset);
                (date, DayCapacity::empty(date, config.hours_per_day()))
            })
            .collect();
        let end = dates::add_days(today, i64::from(config.window_days()) - 1);

        Self {
            start: today,
            end,
            days,
        }
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayCapacity> {
        self.days.get(&date)
    }

    /// Free hours on `date`, or zero outside the window.
    pub fn free_hours(&self, date: NaiveDate) -> f64 {
        self.days.get(&date).map_or(0.0, |day| day.free_hours)
    }

    /// Days in chronological order.
    pub fn days(&self) -> impl Iterator<Item = &DayCapacity> {
        self.days.values()
    }

    /// Books meeting hours on `date`.
    ///
    /// Free hours are recomputed from capacity and clamped at zero, so an
    /// overbooked meeting day is representable. Returns `false` (and changes
    /// nothing) when `date` is outside the window.
    pub fn add_meeting_load(&mut self, date: NaiveDate, hours: f64) -> bool {
        let Some(day) = self.days.get_mut(&date) else {
            return false;
        };
        day.meeting_hours += hours;
        day.free_hours = (day.capacity_hours - day.meeting_hours - day.task_hours).max(0.0);
        true
    }

    /// Places `hours` of `task` on `date` and records the placement.
    ///
    /// Callers place at most the day's free hours. Returns `false` when
    /// `date` is outside the window.
    pub fn add_task_load(&mut self, date: NaiveDate, task: &Task, hours: f64) -> bool {
        let Some(day) = self.days.get_mut(&date) else {
            return false;
        };
        day.task_hours += hours;
        day.free_hours = (day.free_hours - hours).max(0.0);
        day.allocations.push(TaskAllocation {
            task_id: task.id.clone(),
            date,
            hours,
            priority: task.priority,
            title: task.title.clone(),
        });
        true
    }

    /// Consumes the window into days in chronological order.
    pub fn into_days(self) -> Vec<DayCapacity> {
        self.days.into_values().collect()
    }
}
