//! Forward scheduler: propagate dates from the project start date.

use chrono::{Duration, NaiveDate};
use rustc_hash::FxHashMap;

use crate::config::PlanningConfig;
use crate::models::{Project, Task};
use crate::ordering::topological_order;
use crate::{log_changes, log_checks, log_debug};

use super::state::ScheduleState;
use super::PlanningError;

/// Compute start/end dates for every task, walking dependencies forward from
/// the project start date, then derive the project end date as the maximum
/// task end date.
///
/// Tasks whose start date is already set keep their dates (idempotent no-op,
/// supports partially pre-seeded graphs). The project is mutated in place; a
/// failed run mutates nothing.
pub fn compute_forward(
    project: &mut Project,
    config: &PlanningConfig,
) -> Result<(), PlanningError> {
    if project.tasks.is_empty() {
        return Err(PlanningError::NoTasks);
    }
    let project_start = project.start_date.ok_or(PlanningError::MissingStartDate)?;

    // Graph-shape and cycle check before any date is written.
    let order = topological_order(&project.tasks)?;
    let task_map: FxHashMap<&str, &Task> =
        project.tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut state = ScheduleState::with_capacity(project.tasks.len());
    for task in &project.tasks {
        if let Some(start) = task.start_date {
            let end = task.end_date.unwrap_or_else(|| {
                start + Duration::days(task.duration_or(config.default_duration_days) - 1)
            });
            log_checks!(
                config.verbosity,
                "[forward] seeding '{}' from pre-set dates: {} -> {}",
                task.id,
                start,
                end
            );
            state.schedule(&task.id, start, end);
        }
    }

    for task in &order {
        resolve(task, &task_map, &mut state, project_start, config)?;
    }

    // Commit: write dates back and derive the project end, seeded at the
    // project start so a degenerate project still yields a sane value.
    let mut project_end = project_start;
    for task in &mut project.tasks {
        let Some((start, end)) = state.get(&task.id) else {
            continue;
        };
        task.start_date = Some(start);
        task.end_date = Some(end);
        if end > project_end {
            project_end = end;
        }
    }
    project.end_date = Some(project_end);
    log_changes!(
        config.verbosity,
        "[forward] project '{}' ends {}",
        project.name,
        project_end
    );

    Ok(())
}

/// Resolve one task's dates, pulling its dependency first if needed.
///
/// The topological order already guarantees the dependency is resolved, but
/// the recursion keeps this correct even when invoked out of order.
fn resolve(
    task: &Task,
    task_map: &FxHashMap<&str, &Task>,
    state: &mut ScheduleState,
    project_start: NaiveDate,
    config: &PlanningConfig,
) -> Result<(NaiveDate, NaiveDate), PlanningError> {
    if let Some(dates) = state.get(&task.id) {
        log_checks!(
            config.verbosity,
            "[forward] '{}' already scheduled, skipping",
            task.id
        );
        return Ok(dates);
    }

    let start = match &task.dependency {
        None => project_start,
        Some(dep) => {
            // Unknown ids were rejected by the ordering check.
            let Some(dep_task) = task_map.get(dep.task_id.as_str()) else {
                return Err(PlanningError::UnknownDependency {
                    task: task.id.clone(),
                    dependency: dep.task_id.clone(),
                });
            };
            log_debug!(
                config.verbosity,
                "[forward] '{}' pulls dependency '{}'",
                task.id,
                dep.task_id
            );
            let (_, dep_end) = resolve(dep_task, task_map, state, project_start, config)?;
            dep_end + Duration::days(dep.lag_days)
        }
    };
    let end = start + Duration::days(task.duration_or(config.default_duration_days) - 1);

    log_changes!(
        config.verbosity,
        "[forward] '{}': {} -> {}",
        task.id,
        start,
        end
    );
    state.schedule(&task.id, start, end);
    Ok((start, end))
}
