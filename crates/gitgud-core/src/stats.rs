//! Stats counters, the append-only history log, and the read-only
//! summary the stats surface displays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Category;
use crate::config::{Config, Difficulty};
use crate::error::CoreError;
use crate::store::{keys, StateStore};
use crate::streak::{self, Streak, ACHIEVEMENTS};

/// Lifetime event counters. Each field increments exactly once per
/// corresponding event and is never decremented except by explicit reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub total_assigned: u32,
}

impl Stats {
    /// Load from the store; missing or malformed values yield zeros.
    pub fn load(store: &impl StateStore) -> Self {
        store.read_json(keys::STATS)
    }

    /// Persist to the store.
    ///
    /// # Errors
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self, store: &impl StateStore) -> Result<(), CoreError> {
        store.write(keys::STATS, &serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Completed as a percentage of assigned, 0 when nothing assigned.
    pub fn completion_rate(&self) -> u32 {
        if self.total_assigned == 0 {
            return 0;
        }
        self.completed * 100 / self.total_assigned
    }
}

/// One record in the append-only history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: HistoryEvent,
}

/// The three events the log records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HistoryEvent {
    Assigned {
        request_number: u32,
        category: Category,
        difficulty: Difficulty,
    },
    Completed {
        streak: u32,
    },
    Skipped,
}

/// Append one event, stamped now. The log is never truncated or
/// rewritten.
///
/// # Errors
/// Returns an error if the store append fails.
pub fn append_history(store: &impl StateStore, event: HistoryEvent) -> Result<(), CoreError> {
    let entry = HistoryEntry {
        timestamp: Utc::now(),
        event,
    };
    store.append(keys::HISTORY, &serde_json::to_string(&entry)?)?;
    Ok(())
}

/// The most recent `n` history entries, oldest first. Unparseable lines
/// are skipped.
pub fn recent_history(store: &impl StateStore, n: usize) -> Vec<HistoryEntry> {
    let content = match store.read(keys::HISTORY) {
        Some(content) => content,
        None => return Vec::new(),
    };
    let entries: Vec<HistoryEntry> = content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    let skip = entries.len().saturating_sub(n);
    entries.into_iter().skip(skip).collect()
}

/// One badge with its unlock state and progress.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    pub id: &'static str,
    pub emoji: &'static str,
    pub name: &'static str,
    pub unlocked: bool,
    pub progress: String,
}

/// Read-only snapshot of everything the stats surface shows.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_requests: u32,
    pub next_task_in: u32,
    pub frequency: u32,
    pub streak_current: u32,
    pub streak_best: u32,
    pub completed: u32,
    pub skipped: u32,
    pub completion_rate: u32,
    pub difficulty: Difficulty,
    pub remaining_skips: u32,
    pub max_skips: u32,
    pub achievements: Vec<AchievementStatus>,
    pub recent: Vec<HistoryEntry>,
}

/// Number of history entries a summary includes.
const RECENT_ENTRIES: usize = 5;

/// Assemble the summary from the store. Read-only: no counter, quota or
/// streak is touched.
pub fn summary(store: &impl StateStore, config: &Config) -> Summary {
    let counter = store.read_u32(keys::REQUEST_COUNTER, 0);
    let skips_used = store.read_u32(keys::DAILY_SKIPS, 0);
    let stats = Stats::load(store);
    let streak = Streak::load(store);
    let unlocked = streak::unlocked(store);

    let achievements = ACHIEVEMENTS
        .iter()
        .map(|def| AchievementStatus {
            id: def.id,
            emoji: def.emoji,
            name: def.name,
            unlocked: unlocked.iter().any(|id| id == def.id),
            progress: def.progress(&stats, streak.current),
        })
        .collect();

    Summary {
        total_requests: counter,
        next_task_in: config.frequency - counter % config.frequency,
        frequency: config.frequency,
        streak_current: streak.current,
        streak_best: streak.best,
        completed: stats.completed,
        skipped: stats.skipped,
        completion_rate: stats.completion_rate(),
        difficulty: config.difficulty,
        remaining_skips: config.daily_skips.saturating_sub(skips_used),
        max_skips: config.daily_skips,
        achievements,
        recent: recent_history(store, RECENT_ENTRIES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn stats_default_to_zero_on_garbage() {
        let store = MemoryStore::new();
        store.write(keys::STATS, "not json at all").unwrap();
        assert_eq!(Stats::load(&store), Stats::default());
    }

    #[test]
    fn stats_roundtrip() {
        let store = MemoryStore::new();
        let stats = Stats {
            completed: 2,
            skipped: 1,
            total_assigned: 4,
        };
        stats.save(&store).unwrap();
        assert_eq!(Stats::load(&store), stats);
    }

    #[test]
    fn completion_rate_handles_zero_assigned() {
        assert_eq!(Stats::default().completion_rate(), 0);
        let stats = Stats {
            completed: 3,
            skipped: 0,
            total_assigned: 4,
        };
        assert_eq!(stats.completion_rate(), 75);
    }

    #[test]
    fn history_keeps_the_most_recent_entries_in_order() {
        let store = MemoryStore::new();
        for n in 1..=8 {
            append_history(&store, HistoryEvent::Completed { streak: n }).unwrap();
        }
        let recent = recent_history(&store, 5);
        assert_eq!(recent.len(), 5);
        let streaks: Vec<u32> = recent
            .iter()
            .map(|e| match e.event {
                HistoryEvent::Completed { streak } => streak,
                _ => panic!("unexpected event"),
            })
            .collect();
        assert_eq!(streaks, vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn history_skips_unparseable_lines() {
        let store = MemoryStore::new();
        append_history(&store, HistoryEvent::Skipped).unwrap();
        store.append(keys::HISTORY, "corrupted line").unwrap();
        append_history(&store, HistoryEvent::Skipped).unwrap();
        assert_eq!(recent_history(&store, 10).len(), 2);
    }

    #[test]
    fn history_entry_wire_format_is_flat() {
        let store = MemoryStore::new();
        append_history(
            &store,
            HistoryEvent::Assigned {
                request_number: 3,
                category: Category::Function,
                difficulty: Difficulty::Adaptive,
            },
        )
        .unwrap();
        let line = store.read(keys::HISTORY).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["event"], "assigned");
        assert_eq!(value["request_number"], 3);
        assert_eq!(value["category"], "function");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn summary_reflects_store_contents() {
        let store = MemoryStore::new();
        store.write(keys::REQUEST_COUNTER, "7").unwrap();
        store.write(keys::DAILY_SKIPS, "1").unwrap();
        Stats {
            completed: 3,
            skipped: 1,
            total_assigned: 4,
        }
        .save(&store)
        .unwrap();
        store.write(keys::STREAK, "2\n2026-08-05\n6").unwrap();

        let config = Config::default();
        let summary = summary(&store, &config);
        assert_eq!(summary.total_requests, 7);
        assert_eq!(summary.next_task_in, 3);
        assert_eq!(summary.streak_current, 2);
        assert_eq!(summary.streak_best, 6);
        assert_eq!(summary.completion_rate, 75);
        assert_eq!(summary.remaining_skips, 2);
        assert_eq!(summary.achievements.len(), ACHIEVEMENTS.len());
        assert!(!summary.achievements[0].unlocked);
        assert_eq!(summary.achievements[2].progress, "3/10");
    }
}
