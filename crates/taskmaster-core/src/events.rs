use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every accepted state change produces one or more Events.
/// The presentation layer decides how (and whether) to surface them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: String,
        points: f64,
        streak_bonus: u32,
        streak: u32,
        at: DateTime<Utc>,
    },
    /// Cumulative points moved the user into a new rank.
    RankPromoted {
        from: String,
        to: String,
        at: DateTime<Utc>,
    },
}
