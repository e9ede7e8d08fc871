//! Backward scheduler (retroplanning): propagate dates from the project end
//! date back through the dependency graph.

use chrono::{Duration, NaiveDate};
use rustc_hash::FxHashMap;

use crate::config::PlanningConfig;
use crate::models::{Project, Task};
use crate::ordering::topological_order;
use crate::{log_changes, log_checks, log_debug};

use super::state::ScheduleState;
use super::PlanningError;

/// Compute start/end dates for every task, walking dependents backward from
/// the project end date, then derive the project start date as the minimum
/// task start date.
///
/// A task with no dependents ends at the project end date. A task with
/// dependents must end in time for its earliest-starting dependent, honoring
/// that dependent's own lag. Tasks whose end date is already set keep their
/// dates. The project is mutated in place; a failed run mutates nothing.
pub fn compute_backward(
    project: &mut Project,
    config: &PlanningConfig,
) -> Result<(), PlanningError> {
    if project.tasks.is_empty() {
        return Err(PlanningError::NoTasks);
    }
    let project_end = project.end_date.ok_or(PlanningError::MissingEndDate)?;

    // Graph-shape and cycle check before any date is written.
    let order = topological_order(&project.tasks)?;
    let dependents = build_dependents_map(&project.tasks);

    let mut state = ScheduleState::with_capacity(project.tasks.len());
    for task in &project.tasks {
        if let Some(end) = task.end_date {
            let start = task.start_date.unwrap_or_else(|| {
                end - Duration::days(task.duration_or(config.default_duration_days) - 1)
            });
            log_checks!(
                config.verbosity,
                "[backward] seeding '{}' from pre-set dates: {} -> {}",
                task.id,
                start,
                end
            );
            state.schedule(&task.id, start, end);
        }
    }

    // Dependents before their dependency; the recursion self-corrects the
    // exact traversal order anyway.
    for task in order.iter().rev() {
        resolve(task, &dependents, &mut state, project_end, config);
    }

    // Commit: write dates back and derive the project start, seeded at the
    // project end so a degenerate project still yields a sane value.
    let mut project_start = project_end;
    for task in &mut project.tasks {
        let Some((start, end)) = state.get(&task.id) else {
            continue;
        };
        task.start_date = Some(start);
        task.end_date = Some(end);
        if start < project_start {
            project_start = start;
        }
    }
    project.start_date = Some(project_start);
    log_changes!(
        config.verbosity,
        "[backward] project '{}' starts {}",
        project.name,
        project_start
    );

    Ok(())
}

/// Reverse-adjacency index: task id -> the tasks depending on it, each with
/// its own lag. Recomputed fresh per run, never kept in sync with the tasks.
fn build_dependents_map(tasks: &[Task]) -> FxHashMap<&str, Vec<(&Task, i64)>> {
    let mut map: FxHashMap<&str, Vec<(&Task, i64)>> = FxHashMap::default();
    for task in tasks {
        if let Some(dep) = &task.dependency {
            map.entry(dep.task_id.as_str())
                .or_default()
                .push((task, dep.lag_days));
        }
    }
    map
}

/// Resolve one task's dates, pulling its dependents first if needed.
fn resolve(
    task: &Task,
    dependents: &FxHashMap<&str, Vec<(&Task, i64)>>,
    state: &mut ScheduleState,
    project_end: NaiveDate,
    config: &PlanningConfig,
) -> (NaiveDate, NaiveDate) {
    if let Some(dates) = state.get(&task.id) {
        log_checks!(
            config.verbosity,
            "[backward] '{}' already scheduled, skipping",
            task.id
        );
        return dates;
    }

    let end = match dependents.get(task.id.as_str()) {
        // No dependents: end at the project end date.
        None => project_end,
        Some(entries) => {
            // Reverse fan-out: take the tightest constraint across all
            // dependents, each candidate being the dependent's start minus
            // that dependent's own lag.
            let mut earliest: Option<NaiveDate> = None;
            for &(dependent, lag_days) in entries {
                log_debug!(
                    config.verbosity,
                    "[backward] '{}' pulls dependent '{}'",
                    task.id,
                    dependent.id
                );
                let (dependent_start, _) =
                    resolve(dependent, dependents, state, project_end, config);
                let candidate = dependent_start - Duration::days(lag_days);
                earliest = Some(earliest.map_or(candidate, |e| e.min(candidate)));
            }
            earliest.unwrap_or(project_end)
        }
    };
    let start = end - Duration::days(task.duration_or(config.default_duration_days) - 1);

    log_changes!(
        config.verbosity,
        "[backward] '{}': {} -> {}",
        task.id,
        start,
        end
    );
    state.schedule(&task.id, start, end);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project_with(tasks: Vec<Task>, end: NaiveDate) -> Project {
        let mut project = Project::new("test");
        project.end_date = Some(end);
        for task in tasks {
            project.add_task(task);
        }
        project
    }

    #[test]
    fn test_two_task_retroplanning() {
        // Y (2 days, lag 1, depends on X), X (3 days); project ends Mar 10
        let mut project = project_with(
            vec![
                Task::new("x").with_duration(3),
                Task::new("y").with_duration(2).depends_on("x", 1),
            ],
            date(2025, 3, 10),
        );
        compute_backward(&mut project, &PlanningConfig::default()).unwrap();

        // Y has no dependents: it ends at the project end
        let y = project.task("y").unwrap();
        assert_eq!(y.end_date, Some(date(2025, 3, 10)));
        assert_eq!(y.start_date, Some(date(2025, 3, 9)));

        // X must end one lag day before Y starts
        let x = project.task("x").unwrap();
        assert_eq!(x.end_date, Some(date(2025, 3, 8)));
        assert_eq!(x.start_date, Some(date(2025, 3, 6)));

        assert_eq!(project.start_date, Some(date(2025, 3, 6)));
    }

    #[test]
    fn test_fan_out_takes_earliest_constraint() {
        // Two dependents of "base": the tighter one wins
        let mut project = project_with(
            vec![
                Task::new("base").with_duration(2),
                Task::new("y1").with_duration(2).depends_on("base", 1),
                Task::new("y2").with_duration(4).depends_on("base", 0),
            ],
            date(2025, 1, 20),
        );
        compute_backward(&mut project, &PlanningConfig::default()).unwrap();

        // y1: 19 -> 20, candidate for base = 19 - 1 = 18
        // y2: 17 -> 20, candidate for base = 17 - 0 = 17 (tighter, wins)
        assert_eq!(
            project.task("y1").unwrap().start_date,
            Some(date(2025, 1, 19))
        );
        assert_eq!(
            project.task("y2").unwrap().start_date,
            Some(date(2025, 1, 17))
        );
        let base = project.task("base").unwrap();
        assert_eq!(base.end_date, Some(date(2025, 1, 17)));
        assert_eq!(base.start_date, Some(date(2025, 1, 16)));
        assert_eq!(project.start_date, Some(date(2025, 1, 16)));
    }

    #[test]
    fn test_independent_tasks_all_end_at_project_end() {
        let mut project = project_with(
            vec![
                Task::new("a").with_duration(3),
                Task::new("b").with_duration(1),
            ],
            date(2025, 6, 30),
        );
        compute_backward(&mut project, &PlanningConfig::default()).unwrap();

        assert_eq!(project.task("a").unwrap().end_date, Some(date(2025, 6, 30)));
        assert_eq!(project.task("b").unwrap().end_date, Some(date(2025, 6, 30)));
        assert_eq!(project.start_date, Some(date(2025, 6, 28)));
    }

    #[test]
    fn test_no_tasks_error() {
        let mut project = Project::new("empty");
        project.end_date = Some(date(2025, 1, 1));
        let err = compute_backward(&mut project, &PlanningConfig::default()).unwrap_err();
        assert!(matches!(err, PlanningError::NoTasks));
    }

    #[test]
    fn test_missing_end_date_error() {
        let mut project = Project::new("unanchored");
        project.add_task(Task::new("a"));
        let err = compute_backward(&mut project, &PlanningConfig::default()).unwrap_err();
        assert!(matches!(err, PlanningError::MissingEndDate));
        assert_eq!(
            err.to_string(),
            "Project end date is required for retroplanning"
        );
        assert!(project.task("a").unwrap().end_date.is_none());
    }

    #[test]
    fn test_cycle_mutates_nothing() {
        let mut project = project_with(
            vec![
                Task::new("a").with_duration(2).depends_on("b", 0),
                Task::new("b").with_duration(2).depends_on("a", 0),
            ],
            date(2025, 1, 1),
        );
        let err = compute_backward(&mut project, &PlanningConfig::default()).unwrap_err();
        assert!(matches!(err, PlanningError::CircularDependency(_)));
        for task in &project.tasks {
            assert!(task.start_date.is_none());
            assert!(task.end_date.is_none());
        }
        assert!(project.start_date.is_none());
    }

    #[test]
    fn test_preseeded_end_without_start_derives_start() {
        let mut a = Task::new("a").with_duration(4);
        a.end_date = Some(date(2025, 2, 10));
        let mut project = project_with(vec![a], date(2025, 3, 1));
        compute_backward(&mut project, &PlanningConfig::default()).unwrap();
        let a = project.task("a").unwrap();
        assert_eq!(a.start_date, Some(date(2025, 2, 7)));
        assert_eq!(a.end_date, Some(date(2025, 2, 10)));
        assert_eq!(project.start_date, Some(date(2025, 2, 7)));
    }

    #[test]
    fn test_idempotent_rerun() {
        let mut project = project_with(
            vec![
                Task::new("x").with_duration(3),
                Task::new("y").with_duration(2).depends_on("x", 1),
            ],
            date(2025, 3, 10),
        );
        compute_backward(&mut project, &PlanningConfig::default()).unwrap();
        let first = project.clone();
        compute_backward(&mut project, &PlanningConfig::default()).unwrap();
        assert_eq!(project.tasks, first.tasks);
        assert_eq!(project.start_date, first.start_date);
    }
}
