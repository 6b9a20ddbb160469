//! Project bookkeeping around a schedule.
//!
//! `Project` owns the schedule and forwards schedule-affecting events to the
//! team through an optional `Notifier`. Budget, risks, milestones and the
//! change log are carried for reporting only; none of them feed the engine.

use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::config::EngineConfig;
use crate::critical_path::{CpmEngine, CriticalPath};
use crate::log_changes;
use crate::models::{Task, TaskId, TaskStatus};
use crate::notification::Notifier;
use crate::schedule::{Schedule, ScheduleError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub role: String,
}

impl Member {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

/// Append-only roster.
#[derive(Clone, Debug, Default)]
pub struct Team {
    members: Vec<Member>,
}

impl Team {
    pub fn add_member(&mut self, member: Member) {
        self.members.push(member);
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Risk {
    pub description: String,
    /// Likelihood in `[0, 1]`.
    pub probability: f64,
    pub impact: String,
}

impl Risk {
    pub fn new(
        description: impl Into<String>,
        probability: f64,
        impact: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            probability,
            impact: impact.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Milestone {
    pub name: String,
    pub date: NaiveDate,
}

impl Milestone {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }
}

/// Change log entry. `version` is the project version the change was made against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    pub description: String,
    pub version: u32,
    pub recorded_at: NaiveDateTime,
}

pub struct Project {
    name: String,
    description: String,
    start: NaiveDate,
    end: NaiveDate,
    budget: f64,
    schedule: Schedule,
    team: Team,
    risks: Vec<Risk>,
    milestones: Vec<Milestone>,
    changes: Vec<Change>,
    version: u32,
    critical_path: CriticalPath,
    notifier: Option<Box<dyn Notifier>>,
    engine: CpmEngine,
}

impl Project {
    /// Create a project whose schedule starts on `start`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        budget: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            start,
            end,
            budget,
            schedule: Schedule::new(start),
            team: Team::default(),
            risks: Vec::new(),
            milestones: Vec::new(),
            changes: Vec::new(),
            version: 1,
            critical_path: CriticalPath::default(),
            notifier: None,
            engine: CpmEngine::default(),
        }
    }

    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.engine = CpmEngine::new(config);
        self
    }

    /// Install or replace the delivery capability.
    pub fn set_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifier = Some(notifier);
    }

    pub fn add_member(&mut self, member: Member) {
        let message = format!("{} joined the team", member.name);
        self.team.add_member(member);
        self.notify(&message);
    }

    pub fn set_budget(&mut self, budget: f64) {
        self.budget = budget;
        self.notify(&format!("Project budget set to {budget}"));
    }

    pub fn add_task(&mut self, task: Task) -> Result<TaskId, ScheduleError> {
        let id = self.schedule.add_task(task)?;
        self.on_task_added(id);
        Ok(id)
    }

    pub fn add_task_after(
        &mut self,
        task: Task,
        dependency_names: &[&str],
    ) -> Result<TaskId, ScheduleError> {
        let id = self.schedule.add_task_after(task, dependency_names)?;
        self.on_task_added(id);
        Ok(id)
    }

    /// Returns `false`, without notifying, when the dependency already existed.
    pub fn add_dependency(&mut self, task: &str, dependency: &str) -> Result<bool, ScheduleError> {
        let added = self.schedule.add_dependency_by_name(task, dependency)?;
        if added {
            self.critical_path = CriticalPath::default();
            self.notify(&format!("Dependency added: {task} now depends on {dependency}"));
        }
        Ok(added)
    }

    pub fn set_task_status(&mut self, task: &str, status: TaskStatus) -> Result<(), ScheduleError> {
        let id = self
            .schedule
            .find(task)
            .ok_or_else(|| ScheduleError::UnknownTask(task.to_string()))?;
        self.schedule.set_status(id, status)
    }

    pub fn add_risk(&mut self, risk: Risk) {
        let message = format!("New risk added: {}", risk.description);
        self.risks.push(risk);
        self.notify(&message);
    }

    pub fn add_milestone(&mut self, milestone: Milestone) {
        let message = format!("New milestone added: {}", milestone.name);
        self.milestones.push(milestone);
        self.notify(&message);
    }

    /// Log a change against the current version, then bump the version.
    pub fn record_change(&mut self, description: impl Into<String>) {
        self.record_change_at(description, Utc::now().naive_utc());
    }

    pub fn record_change_at(&mut self, description: impl Into<String>, at: NaiveDateTime) {
        let change = Change {
            description: description.into(),
            version: self.version,
            recorded_at: at,
        };
        let message = format!(
            "Change recorded: {} (version {})",
            change.description, change.version
        );
        self.changes.push(change);
        self.version += 1;
        self.notify(&message);
    }

    /// Run the CPM engine over the schedule and keep the resulting critical path.
    pub fn compute_critical_path(&mut self) -> Result<&CriticalPath, ScheduleError> {
        match self.engine.compute(&mut self.schedule) {
            Ok(path) => {
                self.critical_path = path;
                Ok(&self.critical_path)
            }
            Err(err) => {
                self.critical_path = CriticalPath::default();
                Err(err)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn risks(&self) -> &[Risk] {
        &self.risks
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Result of the last successful `compute_critical_path`.
    /// Empty after any schedule change.
    pub fn critical_path(&self) -> &CriticalPath {
        &self.critical_path
    }

    fn on_task_added(&mut self, id: TaskId) {
        self.critical_path = CriticalPath::default();
        if let Some(task) = self.schedule.task(id) {
            let message = format!("New task added: {}", task.name());
            self.notify(&message);
        }
    }

    fn notify(&self, message: &str) {
        log_changes!(self.engine.config().verbosity, "[{}] {}", self.name, message);
        if let Some(notifier) = &self.notifier {
            for member in self.team.members() {
                notifier.deliver(message, member);
            }
        }
    }
}
