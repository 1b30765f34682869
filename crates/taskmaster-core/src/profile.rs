//! Per-user progress record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::rank::RANKS;

/// Cumulative progress for one user.
///
/// `daily_tasks_completed`, `last_daily_reset` and `last_monthly_reset` are
/// tracked and persisted but never read by the engine. They gate nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub points: f64,
    pub rank: String,
    pub tasks_completed: u32,
    pub streak: u32,
    /// On-time percentage over completed tasks (0-100)
    pub precision: u8,
    pub last_completed_date: Option<NaiveDate>,
    pub daily_tasks_completed: u32,
    pub last_daily_reset: DateTime<Utc>,
    pub last_monthly_reset: DateTime<Utc>,
    #[serde(default)]
    pub username: String,
}

impl UserProfile {
    /// Fresh profile for `username`, with reset markers at `now`.
    pub fn new(username: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            points: 0.0,
            rank: RANKS[0].name.to_string(),
            tasks_completed: 0,
            streak: 0,
            precision: 100,
            last_completed_date: None,
            daily_tasks_completed: 0,
            last_daily_reset: now,
            last_monthly_reset: now,
            username: username.into(),
        }
    }

    pub fn precision_tier(&self) -> PrecisionTier {
        PrecisionTier::from_precision(self.precision)
    }
}

/// Coarse bucket of the precision percentage, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PrecisionTier {
    pub fn from_precision(precision: u8) -> Self {
        match precision {
            100..=u8::MAX => PrecisionTier::Excellent,
            75..=99 => PrecisionTier::Good,
            50..=74 => PrecisionTier::Fair,
            _ => PrecisionTier::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrecisionTier::Excellent => "excellent",
            PrecisionTier::Good => "good",
            PrecisionTier::Fair => "fair",
            PrecisionTier::Poor => "poor",
        }
    }
}
