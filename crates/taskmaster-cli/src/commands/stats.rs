use taskmaster_core::{rank, Database};

use super::open_session;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let session = open_session(&db)?;
    let profile = session.profile();

    if json {
        println!("{}", serde_json::to_string_pretty(profile)?);
        return Ok(());
    }

    let next = rank::RANKS
        .iter()
        .find(|r| r.min_points > profile.points)
        .map(|r| format!(" (next: {} at {})", r.name, r.min_points))
        .unwrap_or_default();

    println!("User:       {}", profile.username);
    println!("Rank:       {}{}", profile.rank, next);
    println!("Points:     {}", profile.points);
    println!("Streak:     {} days", profile.streak);
    println!(
        "Precision:  {}% ({})",
        profile.precision,
        profile.precision_tier().label()
    );
    println!("Completed:  {}", profile.tasks_completed);
    Ok(())
}
