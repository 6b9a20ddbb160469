//! Critical path calculation using forward and backward passes.

use chrono::{Days, NaiveDate};
use std::collections::VecDeque;

use crate::config::{DanglingTaskPolicy, EngineConfig};
use crate::models::{TaskId, TaskTiming};
use crate::schedule::{Schedule, ScheduleError};
use crate::{log_changes, log_checks, log_debug};

use super::types::{CpmAnalysis, CriticalPath};

/// Array view of a schedule's topology, indexed by task position.
struct TaskGraph<'a> {
    schedule: &'a Schedule,
    /// Durations in days.
    durations: Vec<i64>,
    /// Predecessor indices per task.
    deps: Vec<Vec<usize>>,
    /// Successor indices per task, built once instead of rescanning per task.
    dependents: Vec<Vec<usize>>,
}

impl<'a> TaskGraph<'a> {
    fn new(schedule: &'a Schedule) -> Result<Self, ScheduleError> {
        let n = schedule.len();
        let mut durations = Vec::with_capacity(n);
        let mut deps: Vec<Vec<usize>> = Vec::with_capacity(n);
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (idx, task) in schedule.tasks().iter().enumerate() {
            durations.push(i64::from(task.duration_days()));

            let mut task_deps = Vec::with_capacity(task.dependencies().len());
            for dep in task.dependencies() {
                let dep_idx = dep.index();
                if dep_idx >= n {
                    return Err(ScheduleError::UnknownDependency {
                        task: task.name().to_string(),
                        dependency: dep.to_string(),
                    });
                }
                task_deps.push(dep_idx);
                dependents[dep_idx].push(idx);
            }
            deps.push(task_deps);
        }

        Ok(Self {
            schedule,
            durations,
            deps,
            dependents,
        })
    }

    fn len(&self) -> usize {
        self.durations.len()
    }

    fn name(&self, idx: usize) -> &'a str {
        self.schedule.tasks()[idx].name()
    }
}

/// Kahn's algorithm: returns task indices with every dependency before its dependents.
///
/// Ties are broken by insertion order so the result is deterministic.
fn topological_sort(graph: &TaskGraph<'_>) -> Result<Vec<usize>, ScheduleError> {
    let n = graph.len();
    let mut in_degree: Vec<usize> = graph.deps.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&idx| in_degree[idx] == 0).collect();
    let mut result = Vec::with_capacity(n);

    while let Some(idx) = queue.pop_front() {
        result.push(idx);
        for &dependent in &graph.dependents[idx] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if result.len() != n {
        let member = find_cycle_member(graph, &in_degree).unwrap_or(0);
        return Err(ScheduleError::CycleDetected(graph.name(member).to_string()));
    }

    Ok(result)
}

/// Pick a task that lies on a cycle, given the in-degrees left over by Kahn's algorithm.
///
/// Every unsorted task still has an unsorted predecessor, so walking
/// predecessors `n` times from any unsorted task must end inside a cycle.
/// Tasks that are merely downstream of a cycle are never returned.
fn find_cycle_member(graph: &TaskGraph<'_>, in_degree: &[usize]) -> Option<usize> {
    let mut current = (0..graph.len()).find(|&idx| in_degree[idx] > 0)?;
    for _ in 0..graph.len() {
        current = graph.deps[current]
            .iter()
            .copied()
            .find(|&dep| in_degree[dep] > 0)?;
    }
    Some(current)
}

/// Earliest (start, finish) offsets in days from the project start.
fn forward_pass(graph: &TaskGraph<'_>, order: &[usize], verbosity: u8) -> Vec<(i64, i64)> {
    let mut earliest = vec![(0_i64, 0_i64); graph.len()];

    for &idx in order {
        let earliest_start = graph.deps[idx]
            .iter()
            .map(|&dep| earliest[dep].1)
            .max()
            .unwrap_or(0);
        let earliest_finish = earliest_start + graph.durations[idx];
        earliest[idx] = (earliest_start, earliest_finish);

        log_debug!(
            verbosity,
            "Task {}: ES = +{}d, EF = +{}d",
            graph.name(idx),
            earliest_start,
            earliest_finish
        );
    }

    earliest
}

/// Latest (start, finish) offsets in days from the project start.
fn backward_pass(
    graph: &TaskGraph<'_>,
    order: &[usize],
    earliest: &[(i64, i64)],
    project_finish: i64,
    config: &EngineConfig,
) -> Result<Vec<(i64, i64)>, ScheduleError> {
    let mut latest = vec![(0_i64, 0_i64); graph.len()];

    for &idx in order.iter().rev() {
        let earliest_finish = earliest[idx].1;

        let latest_finish = if earliest_finish == project_finish {
            earliest_finish
        } else {
            let min_successor_start = graph.dependents[idx]
                .iter()
                .map(|&dependent| latest[dependent].0)
                .min();

            match (min_successor_start, config.dangling_tasks) {
                (Some(latest_start), _) => latest_start,
                (None, DanglingTaskPolicy::AnchorToFinish) => {
                    log_checks!(
                        config.verbosity,
                        "Task {} has no successor, anchoring LF to project finish",
                        graph.name(idx)
                    );
                    project_finish
                }
                (None, DanglingTaskPolicy::Reject) => {
                    return Err(ScheduleError::MissingSuccessor(
                        graph.name(idx).to_string(),
                    ));
                }
            }
        };

        let latest_start = latest_finish - graph.durations[idx];
        latest[idx] = (latest_start, latest_finish);

        log_debug!(
            config.verbosity,
            "Task {}: LS = +{}d, LF = +{}d",
            graph.name(idx),
            latest_start,
            latest_finish
        );
    }

    Ok(latest)
}

fn offset_date(start: NaiveDate, offset: i64, task: &str) -> Result<NaiveDate, ScheduleError> {
    u64::try_from(offset)
        .ok()
        .and_then(|days| start.checked_add_days(Days::new(days)))
        .ok_or_else(|| ScheduleError::DateOutOfRange(task.to_string()))
}

/// Critical Path Method engine.
///
/// Holds configuration only; every call works from the schedule's current
/// contents, so repeated calls on an unchanged schedule give identical results.
#[derive(Clone, Debug, Default)]
pub struct CpmEngine {
    config: EngineConfig,
}

impl CpmEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute timings and the critical path without touching the schedule.
    pub fn analyze(&self, schedule: &Schedule) -> Result<CpmAnalysis, ScheduleError> {
        let verbosity = self.config.verbosity;

        if schedule.is_empty() {
            log_changes!(verbosity, "Empty schedule, critical path is empty");
            return Ok(CpmAnalysis::default());
        }

        let graph = TaskGraph::new(schedule)?;
        let order = topological_sort(&graph)?;
        log_checks!(
            verbosity,
            "Topological order: {:?}",
            order.iter().map(|&idx| graph.name(idx)).collect::<Vec<_>>()
        );

        let earliest = forward_pass(&graph, &order, verbosity);
        let project_finish = earliest.iter().map(|&(_, ef)| ef).max().unwrap_or(0);
        let latest = backward_pass(&graph, &order, &earliest, project_finish, &self.config)?;

        let start = schedule.start();
        let mut timings = Vec::with_capacity(graph.len());
        let mut critical = Vec::new();
        for (idx, (&(es, ef), &(ls, lf))) in earliest.iter().zip(&latest).enumerate() {
            let name = graph.name(idx);
            timings.push(TaskTiming {
                earliest_start: offset_date(start, es, name)?,
                earliest_finish: offset_date(start, ef, name)?,
                latest_start: offset_date(start, ls, name)?,
                latest_finish: offset_date(start, lf, name)?,
            });
            if lf - ef == 0 {
                critical.push(TaskId(idx));
            }
        }

        let critical_path = CriticalPath {
            tasks: critical,
            project_finish: Some(offset_date(start, project_finish, "project finish")?),
        };

        log_changes!(
            verbosity,
            "Project finish: {:?}, critical path: {:?}",
            critical_path.project_finish,
            critical_path.names(schedule)
        );

        Ok(CpmAnalysis {
            timings,
            critical_path,
        })
    }

    /// Compute and store ES/EF/LS/LF on every task, returning the critical path.
    ///
    /// On error all timing fields are cleared; no partial results remain.
    pub fn compute(&self, schedule: &mut Schedule) -> Result<CriticalPath, ScheduleError> {
        match self.analyze(schedule) {
            Ok(CpmAnalysis {
                timings,
                critical_path,
            }) => {
                schedule.apply_timings(timings);
                Ok(critical_path)
            }
            Err(err) => {
                schedule.clear_timings();
                Err(err)
            }
        }
    }
}
