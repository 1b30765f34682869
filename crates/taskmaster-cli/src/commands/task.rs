//! Task management commands for CLI.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::Subcommand;
use serde::Serialize;
use taskmaster_core::{Config, Database, DisplayStatus, Event, Priority, Task, TaskDraft};

use super::{format_time, open_session};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Due date: RFC 3339, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD" (local time)
        #[arg(long)]
        due: String,
        /// Priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Free-form category
        #[arg(long, default_value = "")]
        category: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List tasks
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task completed
    Complete {
        /// Task ID
        id: String,
    },
}

/// A task as listed, with the derived display status.
#[derive(Serialize)]
struct TaskView<'a> {
    #[serde(flatten)]
    task: &'a Task,
    display_status: DisplayStatus,
}

/// Parse a due date given on the command line.
///
/// A bare date means the end of that day.
fn parse_due(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Ok(at.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(23, 59, 59))
        })
        .ok_or_else(|| format!("cannot parse due date '{input}'"))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| format!("due date '{input}' does not exist in the local time zone"))
}

pub fn run(action: TaskAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut session = open_session(&db)?;
    let date_format = config.display.date_format.as_str();

    match action {
        TaskAction::Add {
            title,
            due,
            priority,
            category,
            description,
        } => {
            let draft = TaskDraft::new(title, parse_due(&due)?)
                .with_priority(priority)
                .with_category(category)
                .with_description(description);
            let (task, _) = session.add_task(draft)?;
            println!("Task created: {}", task.id);
        }
        TaskAction::List { json } => {
            let now = Utc::now();
            let views: Vec<TaskView> = session
                .tasks()
                .iter()
                .filter(|t| config.display.show_completed || !t.is_completed())
                .map(|task| TaskView {
                    task,
                    display_status: task.display_status(now),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else if views.is_empty() {
                println!("No tasks");
            } else {
                for view in &views {
                    let t = view.task;
                    println!(
                        "{}  [{}] {} ({}) due {}{}",
                        t.id,
                        view.display_status,
                        t.title,
                        t.priority,
                        format_time(t.due_date, date_format),
                        if t.category.is_empty() {
                            String::new()
                        } else {
                            format!("  #{}", t.category)
                        }
                    );
                }
            }
        }
        TaskAction::Complete { id } => match session.complete_task(&id)? {
            Some(report) => {
                let c = &report.completion;
                println!(
                    "Completed '{}': +{} points (streak {} days, bonus +{})",
                    c.task.title, c.timeliness_points, c.profile.streak, c.streak_bonus
                );
                for event in &report.events {
                    if let Event::RankPromoted { to, .. } = event {
                        println!("Congratulations! You've been promoted to {to}");
                    }
                }
            }
            None => println!("Nothing to do: task {id} is unknown or already completed"),
        },
    }
    Ok(())
}
