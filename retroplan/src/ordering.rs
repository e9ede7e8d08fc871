//! Dependency-order analysis of a project's task graph.
//!
//! Produces a topological order (dependencies before dependents) and detects
//! cycles before either scheduler writes any date.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::models::Task;

/// Errors detected while analyzing the task graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    /// The dependency graph contains a cycle through the named task.
    #[error("Circular dependency detected involving task '{0}'")]
    CircularDependency(String),
    /// A task names a dependency id that is not in the task list.
    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },
    /// Two tasks in one project share an id.
    #[error("Duplicate task id '{0}'")]
    DuplicateTask(String),
}

/// Three-color DFS marking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Finished,
}

/// Build the id -> slice-index arena, rejecting duplicate ids.
fn task_index(tasks: &[Task]) -> Result<FxHashMap<&str, usize>, OrderingError> {
    let mut index = FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
    for (i, task) in tasks.iter().enumerate() {
        if index.insert(task.id.as_str(), i).is_some() {
            return Err(OrderingError::DuplicateTask(task.id.clone()));
        }
    }
    Ok(index)
}

/// Order tasks so that every dependency precedes its dependents.
///
/// Depth-first traversal with three-color marking, driven by an explicit
/// stack so deep dependency chains cannot overflow the call stack. The outer
/// loop follows the input list's original order, which makes the result
/// stable and deterministic without a secondary sort key.
///
/// Fails with [`OrderingError::CircularDependency`] the moment a task already
/// marked in-progress is reached again; the whole ordering is aborted, never
/// a partial result.
pub fn topological_order(tasks: &[Task]) -> Result<Vec<&Task>, OrderingError> {
    let index = task_index(tasks)?;
    let mut marks = vec![Mark::Unvisited; tasks.len()];
    let mut sorted: Vec<&Task> = Vec::with_capacity(tasks.len());

    for start in 0..tasks.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        let mut stack = vec![start];
        while let Some(&i) = stack.last() {
            match marks[i] {
                Mark::Finished => {
                    stack.pop();
                }
                // Second visit: the dependency chain below is done.
                Mark::InProgress => {
                    marks[i] = Mark::Finished;
                    sorted.push(&tasks[i]);
                    stack.pop();
                }
                Mark::Unvisited => {
                    marks[i] = Mark::InProgress;
                    if let Some(dep) = &tasks[i].dependency {
                        let Some(&j) = index.get(dep.task_id.as_str()) else {
                            return Err(OrderingError::UnknownDependency {
                                task: tasks[i].id.clone(),
                                dependency: dep.task_id.clone(),
                            });
                        };
                        match marks[j] {
                            Mark::InProgress => {
                                return Err(OrderingError::CircularDependency(
                                    tasks[j].id.clone(),
                                ));
                            }
                            Mark::Finished => {}
                            Mark::Unvisited => stack.push(j),
                        }
                    }
                }
            }
        }
    }

    Ok(sorted)
}

/// Check whether the task graph contains a dependency cycle.
///
/// Attempts the full ordering and reports true exactly on the cycle failure,
/// without surfacing the partial result.
pub fn has_circular_dependency(tasks: &[Task]) -> bool {
    matches!(
        topological_order(tasks),
        Err(OrderingError::CircularDependency(_))
    )
}
