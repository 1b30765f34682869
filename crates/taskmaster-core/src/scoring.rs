//! Scoring and progression engine.
//!
//! Pure functions over tasks and profiles. Nothing here touches storage or
//! the clock; callers pass `now` and `today` in.
//!
//! ## Timeliness points
//!
//! | Priority | Early | Exactly at due | Late |
//! |----------|-------|----------------|------|
//! | high     | 12    | 10             | 8    |
//! | medium   | 6     | 5              | 4    |
//! | low      | 2.5   | 2              | 1.5  |
//!
//! ## Streak bonus
//!
//! | Streak (days) | Bonus |
//! |---------------|-------|
//! | >= 30         | 250   |
//! | >= 14         | 100   |
//! | >= 7          | 50    |
//! | >= 3          | 20    |
//! | otherwise     | 0     |

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::history::HistoryEntry;
use crate::profile::UserProfile;
use crate::rank::{determine_rank, RankChange};
use crate::task::{Priority, Task};

/// Points for finishing `task` at `completion_time`.
pub fn timeliness_points(task: &Task, completion_time: DateTime<Utc>) -> f64 {
    if completion_time > task.due_date {
        return match task.priority {
            Priority::High => 8.0,
            Priority::Medium => 4.0,
            Priority::Low => 1.5,
        };
    }

    let early = completion_time < task.due_date;
    let (base, early_bonus) = match task.priority {
        Priority::High => (10.0, 2.0),
        Priority::Medium => (5.0, 1.0),
        Priority::Low => (2.0, 0.5),
    };
    if early {
        base + early_bonus
    } else {
        base
    }
}

/// Stepped bonus for holding a streak.
pub fn streak_bonus(streak: u32) -> u32 {
    match streak {
        30..=u32::MAX => 250,
        14..=29 => 100,
        7..=13 => 50,
        3..=6 => 20,
        _ => 0,
    }
}

/// Streak after a completion on `today`.
///
/// Several completions on the same day leave the streak unchanged.
///
/// # Errors
/// Returns [`EngineError::ClockSkew`] if `today` precedes the last recorded
/// completion date.
pub fn update_streak(profile: &UserProfile, today: NaiveDate) -> Result<u32, EngineError> {
    let Some(last) = profile.last_completed_date else {
        return Ok(1);
    };

    match (today - last).num_days() {
        0 => Ok(profile.streak),
        1 => Ok(profile.streak.saturating_add(1)),
        d if d > 1 => Ok(1),
        _ => Err(EngineError::ClockSkew { last, today }),
    }
}

/// Percentage of completed tasks finished at or before their due date.
///
/// Pending tasks are ignored. With nothing completed the result is 100.
pub fn precision<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> u8 {
    let (total, on_time) = tasks
        .into_iter()
        .filter(|t| t.is_completed())
        .fold((0u32, 0u32), |(total, on_time), t| {
            (total + 1, on_time + u32::from(t.completed_on_time()))
        });

    if total == 0 {
        return 100;
    }
    (f64::from(on_time) / f64::from(total) * 100.0).round() as u8
}

/// Everything a completion changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub task: Task,
    pub profile: UserProfile,
    pub history_entry: HistoryEntry,
    pub timeliness_points: f64,
    pub streak_bonus: u32,
    pub rank_change: RankChange,
}

/// Complete `task_id` at `now` (calendar day `today`).
///
/// Returns `Ok(None)` when the id is unknown or the task is already
/// completed, so a repeated request is a no-op. The inputs are not modified;
/// the caller installs the returned state.
///
/// # Errors
/// Fails only when the streak cannot be advanced because of clock skew.
pub fn complete_task(
    task_id: &str,
    tasks: &[Task],
    profile: &UserProfile,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<Option<Completion>, EngineError> {
    let Some(task) = tasks.iter().find(|t| t.id == task_id) else {
        return Ok(None);
    };
    if task.is_completed() {
        return Ok(None);
    }

    let timeliness = timeliness_points(task, now);
    let streak = update_streak(profile, today)?;
    let bonus = streak_bonus(streak);
    let points = profile.points + timeliness + f64::from(bonus);

    let completed = task.clone().into_completed(timeliness, now);
    let precision = precision(
        tasks
            .iter()
            .map(|t| if t.id == task_id { &completed } else { t }),
    );

    let rank_change = determine_rank(points, &profile.rank);

    let updated_profile = UserProfile {
        points,
        rank: rank_change.current.clone(),
        tasks_completed: profile.tasks_completed + 1,
        streak,
        precision,
        last_completed_date: Some(today),
        daily_tasks_completed: profile.daily_tasks_completed + 1,
        ..profile.clone()
    };

    Ok(Some(Completion {
        history_entry: HistoryEntry::snapshot(&completed),
        task: completed,
        profile: updated_profile,
        timeliness_points: timeliness,
        streak_bonus: bonus,
        rank_change,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, d, h, 0, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn task(priority: Priority, due: DateTime<Utc>) -> Task {
        Task::from_draft(TaskDraft::new("task", due).with_priority(priority)).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile::new("ada", at(1, 0))
    }

    fn priority_strategy() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Medium),
            Just(Priority::High)
        ]
    }

    #[test]
    fn early_high_priority_example() {
        // due tomorrow 10:00, done today 09:00
        let t = task(Priority::High, at(11, 10));
        assert_eq!(timeliness_points(&t, at(10, 9)), 12.0);
    }

    #[test]
    fn late_medium_priority_example() {
        let t = task(Priority::Medium, at(9, 12));
        assert_eq!(timeliness_points(&t, at(10, 9)), 4.0);
    }

    #[test]
    fn exactly_on_due_gets_no_early_bonus() {
        let due = at(10, 9);
        assert_eq!(timeliness_points(&task(Priority::High, due), due), 10.0);
        assert_eq!(timeliness_points(&task(Priority::Medium, due), due), 5.0);
        assert_eq!(timeliness_points(&task(Priority::Low, due), due), 2.0);
    }

    #[test]
    fn low_priority_fractional_points() {
        let due = at(10, 9);
        let t = task(Priority::Low, due);
        assert_eq!(timeliness_points(&t, due - Duration::minutes(1)), 2.5);
        assert_eq!(timeliness_points(&t, due + Duration::minutes(1)), 1.5);
    }

    #[test]
    fn streak_bonus_boundaries() {
        assert_eq!(streak_bonus(0), 0);
        assert_eq!(streak_bonus(2), 0);
        assert_eq!(streak_bonus(3), 20);
        assert_eq!(streak_bonus(6), 20);
        assert_eq!(streak_bonus(7), 50);
        assert_eq!(streak_bonus(13), 50);
        assert_eq!(streak_bonus(14), 100);
        assert_eq!(streak_bonus(29), 100);
        assert_eq!(streak_bonus(30), 250);
        assert_eq!(streak_bonus(365), 250);
    }

    proptest! {
        #[test]
        fn streak_bonus_is_monotonic(a in 0u32..1000, b in 0u32..1000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(streak_bonus(lo) <= streak_bonus(hi));
        }

        #[test]
        fn early_completion_beats_on_time_beats_late(
            priority in priority_strategy(),
            offset_mins in 1i64..100_000,
        ) {
            let due = at(15, 12);
            let t = task(priority, due);
            let early = timeliness_points(&t, due - Duration::minutes(offset_mins));
            let exact = timeliness_points(&t, due);
            let late = timeliness_points(&t, due + Duration::minutes(offset_mins));
            prop_assert!(early > exact);
            prop_assert!(exact > late);
            // Early points do not depend on how early.
            prop_assert_eq!(early, timeliness_points(&t, due - Duration::minutes(1)));
        }
    }

    #[test]
    fn update_streak_transitions() {
        let mut p = profile();
        assert_eq!(update_streak(&p, date(10)).unwrap(), 1);

        p.streak = 4;
        p.last_completed_date = Some(date(10));
        assert_eq!(update_streak(&p, date(10)).unwrap(), 4);
        assert_eq!(update_streak(&p, date(11)).unwrap(), 5);
        assert_eq!(update_streak(&p, date(12)).unwrap(), 1);
    }

    #[test]
    fn update_streak_reports_clock_skew() {
        let mut p = profile();
        p.streak = 2;
        p.last_completed_date = Some(date(10));
        assert_eq!(
            update_streak(&p, date(9)),
            Err(EngineError::ClockSkew {
                last: date(10),
                today: date(9)
            })
        );
    }

    #[test]
    fn precision_cases() {
        assert_eq!(precision(&[] as &[Task]), 100);

        let due = at(10, 12);
        let on_time = task(Priority::High, due).into_completed(12.0, due - Duration::hours(1));
        let late = task(Priority::High, due).into_completed(8.0, due + Duration::hours(1));
        let pending = task(Priority::Low, due);

        assert_eq!(precision(&[on_time.clone(), on_time.clone()]), 100);
        assert_eq!(precision(&[late.clone(), on_time.clone()]), 50);
        assert_eq!(precision(&[late.clone(), on_time.clone(), pending]), 50);
        assert_eq!(precision(&[late.clone(), on_time.clone(), on_time]), 67);
        assert_eq!(precision(&[late]), 0);
    }

    #[test]
    fn complete_task_full_transition() {
        let t = task(Priority::High, at(11, 10));
        let tasks = vec![t.clone()];
        let p = profile();

        let done = complete_task(&t.id, &tasks, &p, at(10, 9), date(10))
            .unwrap()
            .unwrap();

        assert!(done.task.is_completed());
        assert_eq!(done.task.points, 12.0);
        assert_eq!(done.task.completed_at, Some(at(10, 9)));
        assert_eq!(done.timeliness_points, 12.0);
        assert_eq!(done.streak_bonus, 0);
        assert_eq!(done.profile.points, 12.0);
        assert_eq!(done.profile.streak, 1);
        assert_eq!(done.profile.tasks_completed, 1);
        assert_eq!(done.profile.daily_tasks_completed, 1);
        assert_eq!(done.profile.precision, 100);
        assert_eq!(done.profile.last_completed_date, Some(date(10)));
        assert_eq!(done.history_entry.task(), &done.task);
        assert!(!done.rank_change.promoted());
        // inputs untouched
        assert!(!tasks[0].is_completed());
        assert_eq!(p.points, 0.0);
    }

    #[test]
    fn precision_counts_the_task_being_completed() {
        let t = task(Priority::Medium, at(9, 12));
        let tasks = vec![t.clone()];
        let done = complete_task(&t.id, &tasks, &profile(), at(10, 9), date(10))
            .unwrap()
            .unwrap();
        assert_eq!(done.profile.precision, 0);
        assert_eq!(done.task.points, 4.0);
    }

    #[test]
    fn completing_unknown_or_completed_task_is_noop() {
        let t = task(Priority::Low, at(11, 10));
        let done = t.clone().into_completed(2.5, at(10, 9));
        assert!(complete_task("missing", &[t], &profile(), at(10, 9), date(10))
            .unwrap()
            .is_none());
        assert!(complete_task(&done.id, &[done.clone()], &profile(), at(10, 9), date(10))
            .unwrap()
            .is_none());
    }

    #[test]
    fn streak_bonus_added_to_points() {
        let t = task(Priority::Medium, at(20, 12));
        let mut p = profile();
        p.streak = 6;
        p.last_completed_date = Some(date(9));
        p.points = 40.0;

        let done = complete_task(&t.id, &[t.clone()], &p, at(10, 9), date(10))
            .unwrap()
            .unwrap();
        assert_eq!(done.profile.streak, 7);
        assert_eq!(done.streak_bonus, 50);
        assert_eq!(done.profile.points, 40.0 + 6.0 + 50.0);
    }

    #[test]
    fn crossing_into_apprentice_promotes() {
        let t = task(Priority::High, at(20, 12));
        let mut p = profile();
        p.points = 89.0;

        let done = complete_task(&t.id, &[t.clone()], &p, at(10, 9), date(10))
            .unwrap()
            .unwrap();
        assert_eq!(done.profile.points, 101.0);
        assert!(done.rank_change.promoted());
        assert_eq!(done.rank_change.previous, "Novice");
        assert_eq!(done.profile.rank, "Apprentice");
    }

    #[test]
    fn clock_skew_rejects_completion() {
        let t = task(Priority::High, at(20, 12));
        let mut p = profile();
        p.last_completed_date = Some(date(12));
        let err = complete_task(&t.id, &[t.clone()], &p, at(10, 9), date(10)).unwrap_err();
        assert!(matches!(err, EngineError::ClockSkew { .. }));
    }
}
