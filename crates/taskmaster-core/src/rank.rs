//! Rank bands and promotion detection.

use serde::{Deserialize, Serialize};

/// A named tier covering a range of cumulative points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rank {
    pub name: &'static str,
    pub min_points: f64,
    /// Inclusive upper bound as displayed. Matching uses the next band's
    /// `min_points` so fractional totals never fall between bands.
    pub max_points: f64,
}

/// Ordered, contiguous band table covering `[0, inf)`.
#[rustfmt::skip]
pub const RANKS: [Rank; 10] = [
    Rank { name: "Novice", min_points: 0.0, max_points: 100.0 },
    Rank { name: "Apprentice", min_points: 101.0, max_points: 250.0 },
    Rank { name: "Proficient", min_points: 251.0, max_points: 500.0 },
    Rank { name: "Expert", min_points: 501.0, max_points: 800.0 },
    Rank { name: "Master", min_points: 801.0, max_points: 1200.0 },
    Rank { name: "Grandmaster", min_points: 1201.0, max_points: 1800.0 },
    Rank { name: "Legend", min_points: 1801.0, max_points: 2500.0 },
    Rank { name: "Titan", min_points: 2501.0, max_points: 3500.0 },
    Rank { name: "Champion", min_points: 3501.0, max_points: 5000.0 },
    Rank { name: "Hero", min_points: 5001.0, max_points: f64::INFINITY },
];

/// Find the band containing `points`.
///
/// Falls back to the highest band if nothing matches (only reachable with
/// negative or NaN totals).
pub fn rank_for(points: f64) -> &'static Rank {
    RANKS
        .iter()
        .enumerate()
        .find(|(i, rank)| {
            let upper = RANKS
                .get(i + 1)
                .map_or(f64::INFINITY, |next| next.min_points);
            points >= rank.min_points && points < upper
        })
        .map(|(_, rank)| rank)
        .unwrap_or(&RANKS[RANKS.len() - 1])
}

/// Result of re-ranking after a points change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankChange {
    pub previous: String,
    pub current: String,
}

impl RankChange {
    /// True when the rank name changed. Points never decrease, so any change
    /// is a promotion.
    pub fn promoted(&self) -> bool {
        self.previous != self.current
    }
}

/// Rank for `points`, reported against the rank held before.
pub fn determine_rank(points: f64, previous: &str) -> RankChange {
    RankChange {
        previous: previous.to_string(),
        current: rank_for(points).name.to_string(),
    }
}
