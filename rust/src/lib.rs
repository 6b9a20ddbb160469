//! Critical Path Method scheduling for project task networks.
//!
//! A `Schedule` holds tasks (name, duration in days, predecessors) and the
//! project start date. `CpmEngine::compute` assigns earliest/latest start and
//! finish dates to every task and returns the zero-slack critical path.
//! `Project`, the notifiers and the report renderer are bookkeeping around it.

// Allow clippy warning triggered by PyO3 macro expansion
#![cfg_attr(feature = "python", allow(clippy::useless_conversion))]

mod config;
pub mod critical_path;
pub mod logging;
mod models;
pub mod notification;
pub mod project;
pub mod report;
mod schedule;

#[cfg(feature = "python")]
mod python;

pub use config::{DanglingTaskPolicy, EngineConfig};
pub use critical_path::{CpmAnalysis, CpmEngine, CriticalPath};
pub use models::{Task, TaskId, TaskStatus, TaskTiming};
pub use notification::{Channel, Notice, Notifier, Outbox};
pub use project::{Change, Member, Milestone, Project, Risk, Team};
pub use report::{render_report, ProjectReport};
pub use schedule::{Schedule, ScheduleError};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_core_types_are_thread_safe() {
        assert_send_sync::<Schedule>();
        assert_send_sync::<CpmEngine>();
        assert_send_sync::<Task>();
        assert_send_sync::<Project>();
    }

    #[test]
    fn test_mutate_then_compute_behind_mutex() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let shared = Mutex::new(Schedule::new(start));
        let engine = CpmEngine::default();

        let path = {
            let mut schedule = shared.lock().unwrap();
            let a = schedule.add_task(Task::new("a", 5)).unwrap();
            schedule.add_task(Task::new("b", 3).depends_on(a)).unwrap();
            engine.compute(&mut schedule).unwrap()
        };

        let schedule = shared.lock().unwrap();
        assert_eq!(path.names(&schedule), vec!["a", "b"]);
    }
}
