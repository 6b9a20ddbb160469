//! Core data types for the scheduling system.

use chrono::NaiveDate;
use std::fmt;

use crate::schedule::ScheduleError;

/// Handle to a task inside the `Schedule` that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) usize);

impl TaskId {
    /// Position of the task in its schedule's insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Progress status of a task. Informational only; the engine ignores it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::NotStarted => "not started",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Done => "done",
        };
        f.write_str(label)
    }
}

/// Timing fields written by the CPM engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskTiming {
    /// Earliest possible start (forward pass).
    pub earliest_start: NaiveDate,
    /// Earliest possible finish (forward pass).
    pub earliest_finish: NaiveDate,
    /// Latest allowable start (backward pass).
    pub latest_start: NaiveDate,
    /// Latest allowable finish (backward pass).
    pub latest_finish: NaiveDate,
}

impl TaskTiming {
    /// Slack in days: `LF - EF`.
    pub fn slack_days(&self) -> i64 {
        (self.latest_finish - self.earliest_finish).num_days()
    }

    pub fn is_critical(&self) -> bool {
        self.slack_days() == 0
    }
}

/// A scheduling unit: a named duration with predecessor handles.
///
/// Name, duration and dependencies are fixed once the task is in a schedule
/// (dependencies can only grow through `Schedule::add_dependency`).
#[derive(Clone, Debug)]
pub struct Task {
    name: String,
    duration_days: u32,
    pub(crate) dependencies: Vec<TaskId>,
    description: Option<String>,
    assignee: Option<String>,
    pub(crate) status: TaskStatus,
    pub(crate) timing: Option<TaskTiming>,
}

impl Task {
    pub fn new(name: impl Into<String>, duration_days: u32) -> Self {
        Self {
            name: name.into(),
            duration_days,
            dependencies: Vec::new(),
            description: None,
            assignee: None,
            status: TaskStatus::default(),
            timing: None,
        }
    }

    /// Build a task whose duration is the whole number of days from `start` to `end`.
    pub fn from_dates(
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, ScheduleError> {
        let name = name.into();
        let days = (end - start).num_days();
        let duration_days =
            u32::try_from(days).map_err(|_| ScheduleError::InvalidDuration(name.clone()))?;
        Ok(Self::new(name, duration_days))
    }

    /// Add a predecessor. Repeated handles are ignored.
    pub fn depends_on(mut self, dependency: TaskId) -> Self {
        self.push_dependency(dependency);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn push_dependency(&mut self, dependency: TaskId) -> bool {
        if self.dependencies.contains(&dependency) {
            return false;
        }
        self.dependencies.push(dependency);
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn dependencies(&self) -> &[TaskId] {
        &self.dependencies
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Timing from the last successful `CpmEngine::compute`, if still current.
    pub fn timing(&self) -> Option<&TaskTiming> {
        self.timing.as_ref()
    }
}
