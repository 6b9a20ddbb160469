//! Plain text project summary.

use std::fmt;

use crate::models::Task;
use crate::project::Project;

fn task_window(task: &Task) -> String {
    match task.timing() {
        Some(t) => format!(
            "{} to {}, slack {}d",
            t.earliest_start,
            t.earliest_finish,
            t.slack_days()
        ),
        None => format!("{}d, not scheduled", task.duration_days()),
    }
}

/// Read-only view of a project that formats as the text report.
pub struct ProjectReport<'a>(pub &'a Project);

impl fmt::Display for ProjectReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let project = self.0;
        let schedule = project.schedule();

        writeln!(f, "Activity report for project '{}'", project.name())?;
        writeln!(f, "Version: {}", project.version())?;
        writeln!(f, "Dates: {} to {}", project.start(), project.end())?;
        writeln!(f, "Budget: {}", project.budget())?;

        writeln!(f, "Team:")?;
        for member in project.team().members() {
            writeln!(f, "  {} ({})", member.name, member.role)?;
        }

        writeln!(f, "Tasks:")?;
        for task in schedule.tasks() {
            writeln!(
                f,
                "  {} ({}), Assignee: {}, Status: {}",
                task.name(),
                task_window(task),
                task.assignee().unwrap_or("-"),
                task.status()
            )?;
        }

        writeln!(f, "Milestones:")?;
        for milestone in project.milestones() {
            writeln!(f, "  {} ({})", milestone.name, milestone.date)?;
        }

        writeln!(f, "Risks:")?;
        for risk in project.risks() {
            writeln!(
                f,
                "  {} (Probability: {}, Impact: {})",
                risk.description, risk.probability, risk.impact
            )?;
        }

        writeln!(f, "Critical path:")?;
        for id in project.critical_path().iter() {
            if let Some(task) = schedule.task(id) {
                writeln!(f, "  {} ({})", task.name(), task_window(task))?;
            }
        }
        if let Some(finish) = project.critical_path().project_finish() {
            writeln!(f, "Project finish: {finish}")?;
        }
        Ok(())
    }
}

/// Render the project summary and its last computed critical path.
pub fn render_report(project: &Project) -> String {
    ProjectReport(project).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::project::{Member, Milestone, Risk};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_project() -> Project {
        let mut project = Project::new(
            "Launch",
            "Product launch",
            date(2024, 1, 1),
            date(2024, 3, 31),
            1200.0,
        );
        project.add_member(Member::new("Modou", "Project lead"));
        project
            .add_task(
                Task::new("design", 2)
                    .with_assignee("Modou")
                    .with_status(TaskStatus::Done),
            )
            .unwrap();
        project
            .add_task_after(Task::new("build", 3), &["design"])
            .unwrap();
        project.add_milestone(Milestone::new("Design frozen", date(2024, 1, 3)));
        project.add_risk(Risk::new("Late supplier", 0.3, "High"));
        project
    }

    #[test]
    fn test_report_before_compute() {
        let report = render_report(&make_project());
        assert!(report.starts_with("Activity report for project 'Launch'\n"));
        assert!(report.contains("  Modou (Project lead)\n"));
        assert!(report.contains("  design (2d, not scheduled), Assignee: Modou, Status: done\n"));
        assert!(report.contains("  Design frozen (2024-01-03)\n"));
        assert!(report.contains("  Late supplier (Probability: 0.3, Impact: High)\n"));
        assert!(report.ends_with("Critical path:\n"));
    }

    #[test]
    fn test_report_lists_critical_path() {
        let mut project = make_project();
        project.compute_critical_path().unwrap();
        let report = render_report(&project);

        let path_section = report.split("Critical path:\n").nth(1).unwrap();
        assert!(path_section.contains("  design (2024-01-01 to 2024-01-03, slack 0d)\n"));
        assert!(path_section.contains("  build (2024-01-03 to 2024-01-06, slack 0d)\n"));
        assert!(path_section.ends_with("Project finish: 2024-01-06\n"));
    }
}
