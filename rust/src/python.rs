//! Python bindings for the CPM engine.

use chrono::NaiveDate;
use pyo3::prelude::*;

use crate::config::{DanglingTaskPolicy, EngineConfig};
use crate::critical_path::CpmEngine;
use crate::models::Task;
use crate::schedule::{Schedule, ScheduleError};

impl From<ScheduleError> for PyErr {
    fn from(err: ScheduleError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

/// A task as supplied from Python: dependencies are referenced by name.
#[pyclass(name = "TaskInput")]
#[derive(Clone, Debug)]
pub struct PyTaskInput {
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub duration_days: u32,
    #[pyo3(get, set)]
    pub dependencies: Vec<String>,
}

#[pymethods]
impl PyTaskInput {
    #[new]
    #[pyo3(signature = (name, duration_days, dependencies=Vec::new()))]
    fn new(name: String, duration_days: u32, dependencies: Vec<String>) -> Self {
        Self {
            name,
            duration_days,
            dependencies,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "TaskInput(name={:?}, duration_days={}, deps={})",
            self.name,
            self.duration_days,
            self.dependencies.len()
        )
    }
}

/// Computed timing for one task.
#[pyclass(name = "TaskTimingInfo")]
#[derive(Clone, Debug)]
pub struct PyTaskTimingInfo {
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub earliest_start: NaiveDate,
    #[pyo3(get)]
    pub earliest_finish: NaiveDate,
    #[pyo3(get)]
    pub latest_start: NaiveDate,
    #[pyo3(get)]
    pub latest_finish: NaiveDate,
    #[pyo3(get)]
    pub slack_days: i64,
}

#[pymethods]
impl PyTaskTimingInfo {
    fn __repr__(&self) -> String {
        format!(
            "TaskTimingInfo(name={:?}, es={}, ef={}, slack={})",
            self.name, self.earliest_start, self.earliest_finish, self.slack_days
        )
    }
}

#[pyclass(name = "CpmResult")]
#[derive(Clone, Debug, Default)]
pub struct PyCpmResult {
    /// Timings in input order.
    #[pyo3(get)]
    pub timings: Vec<PyTaskTimingInfo>,
    #[pyo3(get)]
    pub critical_path: Vec<String>,
    #[pyo3(get)]
    pub project_finish: Option<NaiveDate>,
}

#[pymethods]
impl PyCpmResult {
    fn __repr__(&self) -> String {
        format!(
            "CpmResult(tasks={}, critical_path={:?}, project_finish={:?})",
            self.timings.len(),
            self.critical_path,
            self.project_finish
        )
    }
}

/// Build a schedule from Python inputs. Dependencies may appear in any order.
fn build_schedule(tasks: &[PyTaskInput], start: NaiveDate) -> Result<Schedule, ScheduleError> {
    let mut schedule = Schedule::new(start);
    for input in tasks {
        schedule.add_task(Task::new(input.name.clone(), input.duration_days))?;
    }
    for input in tasks {
        for dep in &input.dependencies {
            schedule.add_dependency_by_name(&input.name, dep)?;
        }
    }
    Ok(schedule)
}

/// Compute ES/EF/LS/LF for every task and the critical path.
///
/// # Raises
/// * ValueError on duplicate names, unknown dependencies, cycles, or (unless
///   `anchor_dangling`) a non-terminal task without successors
#[pyfunction]
#[pyo3(signature = (tasks, start, verbosity=0, anchor_dangling=false))]
fn compute_critical_path(
    tasks: Vec<PyTaskInput>,
    start: NaiveDate,
    verbosity: u8,
    anchor_dangling: bool,
) -> PyResult<PyCpmResult> {
    let policy = if anchor_dangling {
        DanglingTaskPolicy::AnchorToFinish
    } else {
        DanglingTaskPolicy::Reject
    };
    let engine = CpmEngine::new(
        EngineConfig::default()
            .with_verbosity(verbosity)
            .with_dangling_tasks(policy),
    );

    let mut schedule = build_schedule(&tasks, start)?;
    let path = engine.compute(&mut schedule)?;

    let timings = schedule
        .tasks()
        .iter()
        .filter_map(|task| {
            task.timing().map(|t| PyTaskTimingInfo {
                name: task.name().to_string(),
                earliest_start: t.earliest_start,
                earliest_finish: t.earliest_finish,
                latest_start: t.latest_start,
                latest_finish: t.latest_finish,
                slack_days: t.slack_days(),
            })
        })
        .collect();

    Ok(PyCpmResult {
        timings,
        critical_path: path.names(&schedule).into_iter().map(String::from).collect(),
        project_finish: path.project_finish(),
    })
}

/// The pathwork.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTaskInput>()?;
    m.add_class::<PyTaskTimingInfo>()?;
    m.add_class::<PyCpmResult>()?;
    m.add_function(wrap_pyfunction!(compute_critical_path, m)?)?;
    Ok(())
}
