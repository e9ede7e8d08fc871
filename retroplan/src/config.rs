//! Configuration for the planning algorithms.

/// Options shared by the forward and backward schedulers.
#[derive(Clone, Debug)]
pub struct PlanningConfig {
    /// Duration applied to tasks without an explicit one, in days.
    pub default_duration_days: i64,
    /// Diagnostic verbosity level (0 = silent, see the logging module).
    pub verbosity: u8,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            default_duration_days: 1,
            verbosity: 0,
        }
    }
}
