//! Task arena with dependency wiring.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::models::{Task, TaskId, TaskStatus, TaskTiming};

/// Errors raised while building or computing a schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Circular dependency detected involving task: {0}")]
    CycleDetected(String),
    #[error("Task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: String, dependency: String },
    #[error("Duplicate task: {0}")]
    DuplicateTask(String),
    #[error("Unknown task: {0}")]
    UnknownTask(String),
    #[error("Task {0} ends before it starts")]
    InvalidDuration(String),
    #[error("Task {0} finishes before the project but has no successor")]
    MissingSuccessor(String),
    #[error("Date out of range while timing task {0}")]
    DateOutOfRange(String),
}

/// An ordered set of tasks plus the project start date.
///
/// Tasks are kept in insertion order, which is used for reporting and for
/// ordering the critical path. It is not assumed to be dependency order.
#[derive(Clone, Debug)]
pub struct Schedule {
    start: NaiveDate,
    tasks: Vec<Task>,
    index: FxHashMap<String, TaskId>,
}

impl Schedule {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            tasks: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Append a task whose dependencies are already in this schedule.
    pub fn add_task(&mut self, mut task: Task) -> Result<TaskId, ScheduleError> {
        if self.index.contains_key(task.name()) {
            return Err(ScheduleError::DuplicateTask(task.name().to_string()));
        }
        if let Some(dep) = task.dependencies.iter().find(|d| d.0 >= self.tasks.len()) {
            return Err(ScheduleError::UnknownDependency {
                task: task.name().to_string(),
                dependency: dep.to_string(),
            });
        }

        self.clear_timings();
        task.timing = None;

        let id = TaskId(self.tasks.len());
        self.index.insert(task.name().to_string(), id);
        self.tasks.push(task);
        Ok(id)
    }

    /// Append a task, resolving its predecessors by name first.
    pub fn add_task_after(
        &mut self,
        mut task: Task,
        dependency_names: &[&str],
    ) -> Result<TaskId, ScheduleError> {
        for name in dependency_names {
            let dep = self
                .find(name)
                .ok_or_else(|| ScheduleError::UnknownDependency {
                    task: task.name().to_string(),
                    dependency: (*name).to_string(),
                })?;
            task.push_dependency(dep);
        }
        self.add_task(task)
    }

    /// Record that `task` cannot start before `dependency` finishes.
    ///
    /// Returns `false` when the edge was already present; stored timings are
    /// then left alone. No cycle check happens here; the engine rejects
    /// cyclic schedules.
    pub fn add_dependency(
        &mut self,
        task: TaskId,
        dependency: TaskId,
    ) -> Result<bool, ScheduleError> {
        let task_name = self
            .task(task)
            .map(|t| t.name().to_string())
            .ok_or_else(|| ScheduleError::UnknownTask(task.to_string()))?;
        if self.task(dependency).is_none() {
            return Err(ScheduleError::UnknownDependency {
                task: task_name,
                dependency: dependency.to_string(),
            });
        }

        let added = self.tasks[task.0].push_dependency(dependency);
        if added {
            self.clear_timings();
        }
        Ok(added)
    }

    pub fn add_dependency_by_name(
        &mut self,
        task: &str,
        dependency: &str,
    ) -> Result<bool, ScheduleError> {
        let task_id = self
            .find(task)
            .ok_or_else(|| ScheduleError::UnknownTask(task.to_string()))?;
        let dep_id = self
            .find(dependency)
            .ok_or_else(|| ScheduleError::UnknownDependency {
                task: task.to_string(),
                dependency: dependency.to_string(),
            })?;
        self.add_dependency(task_id, dep_id)
    }

    /// Update a task's progress status. Timing fields are unaffected.
    pub fn set_status(&mut self, task: TaskId, status: TaskStatus) -> Result<(), ScheduleError> {
        let entry = self
            .tasks
            .get_mut(task.0)
            .ok_or_else(|| ScheduleError::UnknownTask(task.to_string()))?;
        entry.status = status;
        Ok(())
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn ids(&self) -> impl Iterator<Item = TaskId> {
        (0..self.tasks.len()).map(TaskId)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<TaskId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.find(name).and_then(|id| self.task(id))
    }

    /// Tasks that list `id` as a dependency, in insertion order.
    pub fn successors(&self, id: TaskId) -> Vec<TaskId> {
        self.ids()
            .filter(|&other| self.tasks[other.0].dependencies.contains(&id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn clear_timings(&mut self) {
        for task in &mut self.tasks {
            task.timing = None;
        }
    }

    /// Overwrite every task's timing. `timings` is indexed like `tasks`.
    pub(crate) fn apply_timings(&mut self, timings: Vec<TaskTiming>) {
        debug_assert_eq!(timings.len(), self.tasks.len());
        for (task, timing) in self.tasks.iter_mut().zip(timings) {
            task.timing = Some(timing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critical_path::CpmEngine;

    fn make_schedule() -> Schedule {
        Schedule::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn test_add_task_preserves_insertion_order() {
        let mut schedule = make_schedule();
        let a = schedule.add_task(Task::new("a", 5)).unwrap();
        let b = schedule.add_task(Task::new("b", 3).depends_on(a)).unwrap();

        let names: Vec<&str> = schedule.tasks().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(schedule.find("b"), Some(b));
        assert_eq!(schedule.get("b").unwrap().dependencies(), &[a]);
    }

    #[test]
    fn test_duplicate_task_rejected() {
        let mut schedule = make_schedule();
        schedule.add_task(Task::new("a", 5)).unwrap();
        let err = schedule.add_task(Task::new("a", 1)).unwrap_err();
        assert_eq!(err, ScheduleError::DuplicateTask("a".to_string()));
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_dangling_handle_rejected() {
        let mut schedule = make_schedule();
        let err = schedule
            .add_task(Task::new("b", 3).depends_on(TaskId(4)))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownDependency { ref task, .. } if task == "b"));
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_add_task_after_resolves_names() {
        let mut schedule = make_schedule();
        let a = schedule.add_task(Task::new("a", 2)).unwrap();
        let c = schedule.add_task(Task::new("c", 5)).unwrap();
        let d = schedule.add_task_after(Task::new("d", 1), &["a", "c"]).unwrap();
        assert_eq!(schedule.task(d).unwrap().dependencies(), &[a, c]);

        let err = schedule
            .add_task_after(Task::new("e", 1), &["missing"])
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UnknownDependency {
                task: "e".to_string(),
                dependency: "missing".to_string(),
            }
        );
    }

    #[test]
    fn test_successors_scan() {
        let mut schedule = make_schedule();
        let a = schedule.add_task(Task::new("a", 2)).unwrap();
        let b = schedule.add_task(Task::new("b", 3).depends_on(a)).unwrap();
        let c = schedule.add_task(Task::new("c", 5).depends_on(a)).unwrap();
        let d = schedule.add_task_after(Task::new("d", 1), &["b", "c"]).unwrap();

        assert_eq!(schedule.successors(a), vec![b, c]);
        assert_eq!(schedule.successors(b), vec![d]);
        assert!(schedule.successors(d).is_empty());
    }

    #[test]
    fn test_add_dependency_checks_both_ends() {
        let mut schedule = make_schedule();
        let a = schedule.add_task(Task::new("a", 2)).unwrap();
        let b = schedule.add_task(Task::new("b", 3)).unwrap();

        assert_eq!(schedule.add_dependency(b, a), Ok(true));
        assert_eq!(schedule.add_dependency(b, a), Ok(false));
        assert_eq!(schedule.task(b).unwrap().dependencies(), &[a]);

        assert_eq!(
            schedule.add_dependency(TaskId(9), a),
            Err(ScheduleError::UnknownTask("#9".to_string()))
        );
        assert!(matches!(
            schedule.add_dependency_by_name("a", "zzz"),
            Err(ScheduleError::UnknownDependency { .. })
        ));
    }

    #[test]
    fn test_duplicate_edge_keeps_timings() {
        let mut schedule = make_schedule();
        let a = schedule.add_task(Task::new("a", 2)).unwrap();
        let b = schedule.add_task(Task::new("b", 3).depends_on(a)).unwrap();
        CpmEngine::default().compute(&mut schedule).unwrap();

        assert_eq!(schedule.add_dependency_by_name("b", "a"), Ok(false));
        assert!(schedule.task(a).unwrap().timing().is_some());
        assert!(schedule.task(b).unwrap().timing().is_some());
    }

    #[test]
    fn test_dangling_stored_dependency_fails_analysis() {
        let mut schedule = make_schedule();
        schedule.add_task(Task::new("a", 2)).unwrap();
        schedule.add_task(Task::new("b", 3)).unwrap();
        schedule.tasks[1].dependencies.push(TaskId(7));

        let result = CpmEngine::default().analyze(&schedule);
        assert_eq!(
            result.unwrap_err(),
            ScheduleError::UnknownDependency {
                task: "b".to_string(),
                dependency: "#7".to_string(),
            }
        );
    }

    #[test]
    fn test_set_status() {
        let mut schedule = make_schedule();
        let a = schedule.add_task(Task::new("a", 2)).unwrap();
        schedule.set_status(a, TaskStatus::Done).unwrap();
        assert_eq!(schedule.task(a).unwrap().status(), TaskStatus::Done);
        assert!(schedule.set_status(TaskId(3), TaskStatus::Done).is_err());
    }
}
