//! Core data types for project-task planning.

use chrono::NaiveDate;

/// A task's single outgoing dependency edge, with optional lag time.
///
/// The lag belongs to the edge: it is the number of days the dependent task
/// waits after its dependency ends before it may start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dependency {
    /// Id of the task this one depends on (must exist in the same project).
    pub task_id: String,
    /// Non-negative delay in days between the dependency's end and this
    /// task's start. 0 means the dependent starts the day its dependency ends.
    pub lag_days: i64,
}

impl Dependency {
    pub fn new(task_id: impl Into<String>, lag_days: i64) -> Self {
        Self {
            task_id: task_id.into(),
            lag_days,
        }
    }
}

/// A task to be planned.
///
/// Each task has at most one dependency, so the project graph is a forest of
/// chains and trees. Dependencies are stored as id keys into the project's
/// task list, never as owning pointers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Unique within a project; used as the graph node key.
    pub id: String,
    /// Duration in days; `None` means "use the configured default".
    pub duration_days: Option<i64>,
    /// At most one edge; absence means "depends on the project anchor only".
    pub dependency: Option<Dependency>,
    /// Absent until computed by a scheduler.
    pub start_date: Option<NaiveDate>,
    /// Absent until computed by a scheduler.
    pub end_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            duration_days: None,
            dependency: None,
            start_date: None,
            end_date: None,
        }
    }

    /// Set an explicit duration in days.
    pub fn with_duration(mut self, days: i64) -> Self {
        self.duration_days = Some(days);
        self
    }

    /// Declare this task's single dependency edge.
    pub fn depends_on(mut self, task_id: impl Into<String>, lag_days: i64) -> Self {
        self.dependency = Some(Dependency::new(task_id, lag_days));
        self
    }

    /// Duration in days, falling back to the given default when unset.
    pub fn duration_or(&self, default_days: i64) -> i64 {
        self.duration_days.unwrap_or(default_days)
    }
}

/// A project owning an ordered collection of tasks.
///
/// Task order is insignificant to the algorithms but preserved for display
/// and used as the deterministic tie-break during ordering.
#[derive(Clone, Debug, Default)]
pub struct Project {
    pub name: String,
    /// Required anchor for forward planning.
    pub start_date: Option<NaiveDate>,
    /// Required anchor for backward planning (retroplanning).
    pub end_date: Option<NaiveDate>,
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Look up a task by id.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}
