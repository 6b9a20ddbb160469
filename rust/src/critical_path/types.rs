//! Result types for critical path calculation.

use chrono::NaiveDate;

use crate::models::{TaskId, TaskTiming};
use crate::schedule::Schedule;

/// Zero-slack tasks of a computed schedule, in schedule order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CriticalPath {
    pub(crate) tasks: Vec<TaskId>,
    pub(crate) project_finish: Option<NaiveDate>,
}

impl CriticalPath {
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    /// Latest earliest-finish over all tasks; `None` for an empty schedule.
    pub fn project_finish(&self) -> Option<NaiveDate> {
        self.project_finish
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks.iter().copied()
    }

    /// Task names resolved against the schedule the path was computed from.
    pub fn names<'a>(&self, schedule: &'a Schedule) -> Vec<&'a str> {
        self.tasks
            .iter()
            .filter_map(|&id| schedule.task(id))
            .map(|t| t.name())
            .collect()
    }
}

/// Output of `CpmEngine::analyze`: timings indexed like the schedule's tasks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CpmAnalysis {
    pub timings: Vec<TaskTiming>,
    pub critical_path: CriticalPath,
}

impl CpmAnalysis {
    pub fn timing(&self, id: TaskId) -> Option<&TaskTiming> {
        self.timings.get(id.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    #[test]
    fn test_names_follow_path_order() {
        let mut schedule = Schedule::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let a = schedule.add_task(Task::new("a", 1)).unwrap();
        let b = schedule.add_task(Task::new("b", 1)).unwrap();
        let path = CriticalPath {
            tasks: vec![a, b],
            project_finish: None,
        };
        assert_eq!(path.names(&schedule), vec!["a", "b"]);
        assert!(path.contains(b));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_default_is_empty() {
        let path = CriticalPath::default();
        assert!(path.is_empty());
        assert_eq!(path.project_finish(), None);
        assert_eq!(path.iter().count(), 0);
    }
}
