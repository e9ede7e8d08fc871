//! Project-task date scheduling.
//!
//! Given a set of tasks linked by single-parent dependency edges, each with a
//! duration and an optional lag before start, compute a consistent start/end
//! date for every task: forward from a project start date with
//! [`compute_forward`], or backward from a project end date (retroplanning)
//! with [`compute_backward`]. Both modes share one graph analysis,
//! [`topological_order`], which orders the tasks and rejects cycles before
//! any date is written.
//!
//! Date arithmetic is plain calendar-day addition; there are no working-day
//! calendars and no resource leveling. The caller owns persistence: the core
//! mutates the [`Project`] it is handed and holds no state across calls.

pub mod logging;
pub mod ordering;
pub mod scheduler;

mod config;
mod models;

pub use config::PlanningConfig;
pub use models::{Dependency, Project, Task};
pub use ordering::{has_circular_dependency, topological_order, OrderingError};
pub use scheduler::{compute_backward, compute_forward, PlanningError, ScheduleState};
