use taskmaster_core::{Config, Database};

use super::{format_time, open_session};

pub fn run(json: bool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let session = open_session(&db)?;
    let history = session.history();

    if json {
        println!("{}", serde_json::to_string_pretty(history)?);
        return Ok(());
    }
    if history.is_empty() {
        println!("No task history available");
        return Ok(());
    }

    let date_format = config.display.date_format.as_str();
    for entry in history {
        let task = entry.task();
        let completed = entry
            .completed_at()
            .map(|at| format_time(at, date_format))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {} | due {} | done {} | {} | +{} points",
            task.id,
            task.title,
            format_time(task.due_date, date_format),
            completed,
            entry.outcome().label(),
            task.points
        );
    }
    Ok(())
}
