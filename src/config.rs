/// Resource limits for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Body executions a `while` loop may perform before it is stopped.
    pub while_iteration_cap: usize,
    /// Nested user function calls allowed before the run is aborted.
    pub max_call_depth: usize,
}

pub const DEFAULT_WHILE_ITERATION_CAP: usize = 1000;
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

impl Default for Config {
    fn default() -> Config {
        Config {
            while_iteration_cap: DEFAULT_WHILE_ITERATION_CAP,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl Config {
    /// The line appended to the output when a `while` loop hits the cap.
    pub fn loop_cap_warning(&self) -> String {
        format!(
            "Warning: loop stopped after {} iterations (possible infinite loop)",
            self.while_iteration_cap
        )
    }
}
