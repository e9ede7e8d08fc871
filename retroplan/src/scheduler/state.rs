//! Per-run schedule state.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

/// Dates resolved during one scheduler run: task_id -> (start_date, end_date).
///
/// Each task transitions unscheduled -> scheduled exactly once per run; the
/// recursion tolerates re-entry into an already-scheduled task as a no-op.
/// Dates are computed into this state first and written back to the tasks
/// only after the whole run succeeds, so a failed run mutates nothing.
#[derive(Clone, Debug, Default)]
pub struct ScheduleState {
    scheduled: FxHashMap<String, (NaiveDate, NaiveDate)>,
}

impl ScheduleState {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scheduled: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Dates for a task, if it has been scheduled in this run.
    pub fn get(&self, task_id: &str) -> Option<(NaiveDate, NaiveDate)> {
        self.scheduled.get(task_id).copied()
    }

    pub fn is_scheduled(&self, task_id: &str) -> bool {
        self.scheduled.contains_key(task_id)
    }

    /// Mark a task scheduled with its resolved dates.
    pub fn schedule(&mut self, task_id: &str, start: NaiveDate, end: NaiveDate) {
        self.scheduled.insert(task_id.to_string(), (start, end));
    }

    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }
}
