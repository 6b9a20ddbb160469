//! Configuration types for the CPM engine.

/// How the backward pass treats a task that finishes before the project
/// finish but has no successor to inherit a latest finish from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DanglingTaskPolicy {
    /// Fail with `ScheduleError::MissingSuccessor`.
    #[default]
    Reject,
    /// Use the project finish as the task's latest finish.
    AnchorToFinish,
}

/// Configuration for `CpmEngine`.
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
    /// Backward pass treatment of non-terminal tasks without successors.
    pub dangling_tasks: DanglingTaskPolicy,
}

impl EngineConfig {
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_dangling_tasks(mut self, policy: DanglingTaskPolicy) -> Self {
        self.dangling_tasks = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.verbosity, 0);
        assert_eq!(config.dangling_tasks, DanglingTaskPolicy::Reject);
    }

    #[test]
    fn test_builder_setters() {
        let config = EngineConfig::default()
            .with_verbosity(2)
            .with_dangling_tasks(DanglingTaskPolicy::AnchorToFinish);
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.dangling_tasks, DanglingTaskPolicy::AnchorToFinish);
    }
}
