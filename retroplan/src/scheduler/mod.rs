//! Forward and backward date computation over a project's task graph.

mod backward;
mod forward;
mod state;

pub use backward::compute_backward;
pub use forward::compute_forward;
pub use state::ScheduleState;

use thiserror::Error;

use crate::ordering::OrderingError;

/// Errors that can occur while planning a project.
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("Project has no tasks")]
    NoTasks,
    #[error("Project start date is required")]
    MissingStartDate,
    #[error("Project end date is required for retroplanning")]
    MissingEndDate,
    #[error("Circular dependency detected involving task '{0}'")]
    CircularDependency(String),
    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },
    #[error("Duplicate task id '{0}'")]
    DuplicateTask(String),
    /// Catch-all for the surrounding application layer; never constructed by
    /// the planning core itself.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<OrderingError> for PlanningError {
    fn from(err: OrderingError) -> Self {
        match err {
            OrderingError::CircularDependency(id) => PlanningError::CircularDependency(id),
            OrderingError::UnknownDependency { task, dependency } => {
                PlanningError::UnknownDependency { task, dependency }
            }
            OrderingError::DuplicateTask(id) => PlanningError::DuplicateTask(id),
        }
    }
}
