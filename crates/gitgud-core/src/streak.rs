//! Day-based completion streaks and milestone achievements.
//!
//! The streak record is three newline-joined fields: current streak,
//! last completion date, best streak. The transition rule runs once per
//! completion event; `best >= current` holds after every update.
//!
//! Achievements are a fixed table of goal definitions evaluated in
//! order. The unlocked set only grows, and each id fires at most once
//! for the lifetime of the stored set.

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::stats::Stats;
use crate::store::{keys, StateStore};

/// Persisted streak record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Streak {
    pub current: u32,
    pub last_completion: Option<NaiveDate>,
    pub best: u32,
}

impl Streak {
    /// Parse the three-field record; malformed fields degrade to defaults.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines();
        let current = lines.next().and_then(|l| l.trim().parse().ok()).unwrap_or(0);
        let last_completion = lines.next().and_then(|l| l.trim().parse().ok());
        let best = lines.next().and_then(|l| l.trim().parse().ok()).unwrap_or(0);
        Self {
            current,
            last_completion,
            best,
        }
    }

    fn to_record(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.current,
            self.last_completion.map(|d| d.to_string()).unwrap_or_default(),
            self.best
        )
    }

    /// Read the stored streak without updating it.
    pub fn load(store: &impl StateStore) -> Self {
        store
            .read(keys::STREAK)
            .map(|text| Self::parse(&text))
            .unwrap_or_default()
    }
}

/// Result of one streak transition.
#[derive(Debug, Clone, Serialize)]
pub struct StreakUpdate {
    pub current: u32,
    pub best: u32,
    /// True only at the moment the best streak is first exceeded.
    pub is_new_record: bool,
}

/// Apply the completion-day transition and persist the record.
///
/// Same day: unchanged. Yesterday: extend. No history: start at 1.
/// Anything else (gap, or an unexpected future date): restart at 1.
///
/// # Errors
/// Returns an error if the store write fails.
pub fn update_streak(store: &impl StateStore) -> Result<StreakUpdate, CoreError> {
    let today = Utc::now().date_naive();
    update_streak_on(store, today)
}

/// Transition relative to an explicit `today` (separated out for tests).
pub fn update_streak_on(
    store: &impl StateStore,
    today: NaiveDate,
) -> Result<StreakUpdate, CoreError> {
    let yesterday = today.checked_sub_days(Days::new(1));
    let mut streak = Streak::load(store);
    let previous_best = streak.best;

    streak.current = match streak.last_completion {
        Some(last) if last == today => streak.current,
        Some(last) if Some(last) == yesterday => streak.current + 1,
        None => 1,
        Some(_) => 1,
    };
    streak.best = streak.best.max(streak.current);
    streak.last_completion = Some(today);
    store.write(keys::STREAK, &streak.to_record())?;

    Ok(StreakUpdate {
        current: streak.current,
        best: streak.best,
        is_new_record: streak.best > previous_best && streak.current > 1,
    })
}

/// What a badge is awarded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Total completed tasks reaching the threshold.
    Completed(u32),
    /// Current streak reaching the threshold in days.
    StreakDays(u32),
}

/// Static badge definition.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub emoji: &'static str,
    pub name: &'static str,
    pub goal: Goal,
}

impl AchievementDef {
    fn is_met(&self, stats: &Stats, streak_current: u32) -> bool {
        match self.goal {
            Goal::Completed(n) => stats.completed >= n,
            Goal::StreakDays(n) => streak_current >= n,
        }
    }

    /// Progress string toward the goal, e.g. "3/10" or "2/7 days".
    pub fn progress(&self, stats: &Stats, streak_current: u32) -> String {
        match self.goal {
            Goal::Completed(n) => format!("{}/{}", stats.completed, n),
            Goal::StreakDays(n) => format!("{}/{} days", streak_current, n),
        }
    }
}

/// Badge definitions in stable evaluation order.
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef { id: "first_task", emoji: "🎯", name: "First Steps", goal: Goal::Completed(1) },
    AchievementDef { id: "five_tasks", emoji: "✋", name: "Getting Hands Dirty", goal: Goal::Completed(5) },
    AchievementDef { id: "ten_tasks", emoji: "📚", name: "Apprentice", goal: Goal::Completed(10) },
    AchievementDef { id: "twentyfive_tasks", emoji: "🔨", name: "Craftsman", goal: Goal::Completed(25) },
    AchievementDef { id: "fifty_tasks", emoji: "🎓", name: "Master", goal: Goal::Completed(50) },
    AchievementDef { id: "hundred_tasks", emoji: "🏆", name: "Legend", goal: Goal::Completed(100) },
    AchievementDef { id: "streak_3", emoji: "🔥", name: "Three in a Row", goal: Goal::StreakDays(3) },
    AchievementDef { id: "streak_7", emoji: "📅", name: "Perfect Week", goal: Goal::StreakDays(7) },
    AchievementDef { id: "streak_14", emoji: "💪", name: "Two Weeks Strong", goal: Goal::StreakDays(14) },
    AchievementDef { id: "streak_30", emoji: "🥇", name: "Golden Month", goal: Goal::StreakDays(30) },
];

/// Ids currently unlocked, in unlock order.
pub fn unlocked(store: &impl StateStore) -> Vec<String> {
    store.read_json(keys::ACHIEVEMENTS)
}

/// Evaluate every locked definition against the given stats and streak,
/// persist once if anything unlocked, and return the new badges.
///
/// # Errors
/// Returns an error if persisting the unlocked set fails.
pub fn check_achievements(
    store: &impl StateStore,
    stats: &Stats,
    streak_current: u32,
) -> Result<Vec<&'static AchievementDef>, CoreError> {
    let mut ids = unlocked(store);
    let mut new = Vec::new();

    for def in ACHIEVEMENTS {
        if !ids.iter().any(|id| id == def.id) && def.is_met(stats, streak_current) {
            ids.push(def.id.to_string());
            new.push(def);
        }
    }

    if !new.is_empty() {
        store.write(keys::ACHIEVEMENTS, &serde_json::to_string(&ids)?)?;
    }
    Ok(new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn seed_streak(store: &MemoryStore, current: u32, last: &str, best: u32) {
        store
            .write(keys::STREAK, &format!("{current}\n{last}\n{best}"))
            .unwrap();
    }

    #[test]
    fn first_completion_starts_at_one() {
        let store = MemoryStore::new();
        let update = update_streak_on(&store, day("2026-08-06")).unwrap();
        assert_eq!(update.current, 1);
        assert_eq!(update.best, 1);
        assert!(!update.is_new_record);
    }

    #[test]
    fn consecutive_day_extends_streak_and_record() {
        let store = MemoryStore::new();
        seed_streak(&store, 4, "2026-08-05", 4);
        let update = update_streak_on(&store, day("2026-08-06")).unwrap();
        assert_eq!(update.current, 5);
        assert_eq!(update.best, 5);
        assert!(update.is_new_record);
    }

    #[test]
    fn same_day_completion_is_unchanged() {
        let store = MemoryStore::new();
        seed_streak(&store, 4, "2026-08-06", 6);
        let update = update_streak_on(&store, day("2026-08-06")).unwrap();
        assert_eq!(update.current, 4);
        assert_eq!(update.best, 6);
        assert!(!update.is_new_record);
    }

    #[test]
    fn gap_resets_to_one() {
        let store = MemoryStore::new();
        seed_streak(&store, 9, "2026-08-01", 9);
        let update = update_streak_on(&store, day("2026-08-06")).unwrap();
        assert_eq!(update.current, 1);
        assert_eq!(update.best, 9);
    }

    #[test]
    fn tying_the_record_again_is_not_a_new_record() {
        let store = MemoryStore::new();
        // Best is 5; extending 4 -> 5 ties but does not exceed it.
        seed_streak(&store, 4, "2026-08-05", 5);
        let update = update_streak_on(&store, day("2026-08-06")).unwrap();
        assert_eq!(update.current, 5);
        assert_eq!(update.best, 5);
        assert!(!update.is_new_record);
    }

    #[test]
    fn malformed_record_degrades_to_defaults() {
        let store = MemoryStore::new();
        store.write(keys::STREAK, "garbage\nalso garbage").unwrap();
        let update = update_streak_on(&store, day("2026-08-06")).unwrap();
        assert_eq!(update.current, 1);
        assert_eq!(update.best, 1);
    }

    #[test]
    fn update_persists_the_new_record() {
        let store = MemoryStore::new();
        seed_streak(&store, 2, "2026-08-05", 2);
        update_streak_on(&store, day("2026-08-06")).unwrap();
        let streak = Streak::load(&store);
        assert_eq!(streak.current, 3);
        assert_eq!(streak.last_completion, Some(day("2026-08-06")));
        assert_eq!(streak.best, 3);
    }

    #[test]
    fn milestones_unlock_once_and_persist() {
        let store = MemoryStore::new();
        let stats = Stats {
            completed: 5,
            ..Stats::default()
        };
        let new = check_achievements(&store, &stats, 0).unwrap();
        let ids: Vec<_> = new.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["first_task", "five_tasks"]);

        // Second evaluation with the same state unlocks nothing.
        let again = check_achievements(&store, &stats, 0).unwrap();
        assert!(again.is_empty());
        assert_eq!(unlocked(&store), vec!["first_task", "five_tasks"]);
    }

    #[test]
    fn streak_badges_follow_the_current_streak() {
        let store = MemoryStore::new();
        let stats = Stats::default();
        let new = check_achievements(&store, &stats, 7).unwrap();
        let ids: Vec<_> = new.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["streak_3", "streak_7"]);
    }

    #[test]
    fn unlocked_set_never_shrinks() {
        let store = MemoryStore::new();
        let stats = Stats {
            completed: 1,
            ..Stats::default()
        };
        check_achievements(&store, &stats, 3).unwrap();
        let before = unlocked(&store);
        // Stats regressing (e.g. after a partial reset race) must not
        // remove already-unlocked ids.
        check_achievements(&store, &Stats::default(), 0).unwrap();
        assert_eq!(unlocked(&store), before);
    }

    #[test]
    fn progress_strings_match_goal_kind() {
        let stats = Stats {
            completed: 3,
            ..Stats::default()
        };
        assert_eq!(ACHIEVEMENTS[2].progress(&stats, 0), "3/10");
        assert_eq!(ACHIEVEMENTS[7].progress(&stats, 2), "2/7 days");
    }

    proptest! {
        #[test]
        fn best_is_never_below_current(
            seed_current in 0u32..50,
            seed_best in 0u32..50,
            gap_days in 0u64..400,
        ) {
            let store = MemoryStore::new();
            let last = day("2026-01-01");
            seed_streak(
                &store,
                seed_current,
                &last.to_string(),
                seed_best,
            );
            let today = last.checked_add_days(Days::new(gap_days)).unwrap();
            let update = update_streak_on(&store, today).unwrap();
            prop_assert!(update.best >= update.current);
        }
    }
}
