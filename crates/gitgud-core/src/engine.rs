//! Per-prompt task assignment state machine.
//!
//! Conceptually two states, derived from the store rather than held in
//! memory: no task outstanding, or one pending task blocking normal
//! flow. Each prompt runs a single synchronous decision pass:
//!
//! 1. disabled -> pass through
//! 2. daily maintenance (lazy skip-quota reset)
//! 3. skip intent -> consume quota / deny / no-op
//! 4. pending task -> re-present it, counters untouched
//! 5. trivial prompt -> pass through, counter untouched
//! 6. count the request; on a frequency boundary, mint an exercise
//!
//! Any internal failure degrades to `Action::Continue` so the host
//! assistant is never blocked by an internal fault.

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Serialize;

use crate::classify::{self, Category};
use crate::config::Config;
use crate::error::CoreError;
use crate::stats::{self, HistoryEvent, Stats};
use crate::store::{keys, StateStore};
use crate::streak::{self, Streak, StreakUpdate};

/// What the caller should present to the user for one prompt.
///
/// Adapters translate these into their own envelope; the engine never
/// assumes a specific envelope shape.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Continue,
    SkipUsed {
        remaining_skips: u32,
        max_skips: u32,
    },
    SkipDenied {
        max_skips: u32,
    },
    PendingTask {
        task: String,
        remaining_skips: u32,
        max_skips: u32,
    },
    NewTask {
        task: String,
        request_number: u32,
        category: Category,
        remaining_skips: u32,
        max_skips: u32,
        current_streak: u32,
    },
}

/// Outcome of a completion call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// No pending task existed; nothing was mutated.
    NothingPending,
    Completed {
        streak: StreakUpdate,
        unlocked: Vec<UnlockedAchievement>,
        stats: Stats,
        /// Qualifying requests until the next assignment.
        next_task_in: u32,
        remaining_skips: u32,
        max_skips: u32,
    },
}

/// A badge unlocked by this completion.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    pub id: &'static str,
    pub emoji: &'static str,
    pub name: &'static str,
}

/// Which slice of persisted state a reset wipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Request counter and pending task.
    Counter,
    /// Stats counters and skip quota.
    Stats,
    /// Everything, including achievements, streak and history.
    All,
}

/// The task assignment engine. Borrows the store per call; all state
/// lives in the store.
pub struct TaskEngine<'a, S: StateStore, R: Rng = Pcg64> {
    store: &'a S,
    rng: R,
}

impl<'a, S: StateStore> TaskEngine<'a, S, Pcg64> {
    /// Engine with an entropy-seeded generator.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            rng: Pcg64::from_entropy(),
        }
    }
}

impl<'a, S: StateStore, R: Rng> TaskEngine<'a, S, R> {
    /// Engine with a caller-provided generator, for deterministic tests.
    pub fn with_rng(store: &'a S, rng: R) -> Self {
        Self { store, rng }
    }

    /// Run the state machine for one prompt.
    ///
    /// Never raises: malformed stored values are read as defaults, and
    /// any write failure degrades to `Action::Continue`.
    pub fn process_prompt(&mut self, prompt: &str, config: &Config) -> Action {
        self.try_process(prompt, config)
            .unwrap_or(Action::Continue)
    }

    fn try_process(&mut self, prompt: &str, config: &Config) -> Result<Action, CoreError> {
        if !config.enabled {
            return Ok(Action::Continue);
        }

        self.daily_maintenance()?;

        if classify::is_skip_request(prompt) {
            return self.handle_skip(config);
        }

        if self.store.exists(keys::PENDING_TASK) {
            return Ok(self.present_pending(config));
        }

        if classify::is_trivial(prompt) {
            return Ok(Action::Continue);
        }

        let count = self.store.read_u32(keys::REQUEST_COUNTER, 0) + 1;
        self.store
            .write(keys::REQUEST_COUNTER, &count.to_string())?;

        if count % config.frequency == 0 {
            self.assign_task(prompt, count, config)
        } else {
            Ok(Action::Continue)
        }
    }

    /// Idempotent per-invocation maintenance: zero the skip quota on the
    /// first call of each day and make sure zero-valued records exist.
    fn daily_maintenance(&self) -> Result<(), CoreError> {
        if !self.store.exists(keys::REQUEST_COUNTER) {
            self.store.write(keys::REQUEST_COUNTER, "0")?;
        }
        if !self.store.exists(keys::DAILY_SKIPS) {
            self.store.write(keys::DAILY_SKIPS, "0")?;
        }
        if !self.store.exists(keys::STATS) {
            Stats::default().save(self.store)?;
        }

        let today = Utc::now().date_naive().to_string();
        if self.store.read(keys::LAST_SKIP_DATE).as_deref() != Some(today.as_str()) {
            self.store.write(keys::DAILY_SKIPS, "0")?;
            self.store.write(keys::LAST_SKIP_DATE, &today)?;
        }
        Ok(())
    }

    fn remaining_skips(&self, config: &Config) -> u32 {
        let used = self.store.read_u32(keys::DAILY_SKIPS, 0);
        config.daily_skips.saturating_sub(used)
    }

    fn handle_skip(&self, config: &Config) -> Result<Action, CoreError> {
        if !self.store.exists(keys::PENDING_TASK) {
            // Skip intent with nothing to skip is a no-op.
            return Ok(Action::Continue);
        }

        let remaining = self.remaining_skips(config);
        if remaining == 0 {
            return Ok(Action::SkipDenied {
                max_skips: config.daily_skips,
            });
        }

        let used = self.store.read_u32(keys::DAILY_SKIPS, 0) + 1;
        self.store.write(keys::DAILY_SKIPS, &used.to_string())?;
        self.store.delete(keys::PENDING_TASK)?;

        let mut stats = Stats::load(self.store);
        stats.skipped += 1;
        stats.save(self.store)?;
        stats::append_history(self.store, HistoryEvent::Skipped)?;

        Ok(Action::SkipUsed {
            remaining_skips: remaining - 1,
            max_skips: config.daily_skips,
        })
    }

    fn present_pending(&self, config: &Config) -> Action {
        let task = self
            .store
            .read(keys::PENDING_TASK)
            .unwrap_or_default()
            .replace('\n', " ");
        Action::PendingTask {
            task,
            remaining_skips: self.remaining_skips(config),
            max_skips: config.daily_skips,
        }
    }

    fn assign_task(
        &mut self,
        prompt: &str,
        request_number: u32,
        config: &Config,
    ) -> Result<Action, CoreError> {
        let category = classify::classify(prompt);
        let exercises = classify::exercises(category);
        let exercise = exercises[self.rng.gen_range(0..exercises.len())];
        let task = format!(
            "[Category: {category}] {exercise} {}",
            config.difficulty.note()
        );

        self.store.write(keys::PENDING_TASK, &task)?;

        let mut stats = Stats::load(self.store);
        stats.total_assigned += 1;
        stats.save(self.store)?;
        stats::append_history(
            self.store,
            HistoryEvent::Assigned {
                request_number,
                category,
                difficulty: config.difficulty,
            },
        )?;

        Ok(Action::NewTask {
            task,
            request_number,
            category,
            remaining_skips: self.remaining_skips(config),
            max_skips: config.daily_skips,
            current_streak: Streak::load(self.store).current,
        })
    }

    /// Mark the pending task completed: streak transition, stats,
    /// achievements, history.
    ///
    /// # Errors
    /// Returns an error if a store write fails mid-flow.
    pub fn complete(&self, config: &Config) -> Result<CompletionOutcome, CoreError> {
        if !self.store.exists(keys::PENDING_TASK) {
            return Ok(CompletionOutcome::NothingPending);
        }

        let update = streak::update_streak(self.store)?;

        let mut stats = Stats::load(self.store);
        stats.completed += 1;
        stats.save(self.store)?;

        let unlocked = streak::check_achievements(self.store, &stats, update.current)?
            .into_iter()
            .map(|def| UnlockedAchievement {
                id: def.id,
                emoji: def.emoji,
                name: def.name,
            })
            .collect();

        self.store.delete(keys::PENDING_TASK)?;
        stats::append_history(
            self.store,
            HistoryEvent::Completed {
                streak: update.current,
            },
        )?;

        let counter = self.store.read_u32(keys::REQUEST_COUNTER, 0);
        Ok(CompletionOutcome::Completed {
            streak: update,
            unlocked,
            stats,
            next_task_in: config.frequency - counter % config.frequency,
            remaining_skips: self.remaining_skips(config),
            max_skips: config.daily_skips,
        })
    }

    /// Idempotent wipe-to-default of one slice of persisted state.
    ///
    /// # Errors
    /// Returns an error if a store write fails.
    pub fn reset(&self, scope: ResetScope) -> Result<(), CoreError> {
        match scope {
            ResetScope::Counter => {
                self.store.write(keys::REQUEST_COUNTER, "0")?;
                self.store.delete(keys::PENDING_TASK)?;
            }
            ResetScope::Stats => {
                Stats::default().save(self.store)?;
                self.store.write(keys::DAILY_SKIPS, "0")?;
            }
            ResetScope::All => {
                self.reset(ResetScope::Counter)?;
                self.reset(ResetScope::Stats)?;
                self.store.write(keys::ACHIEVEMENTS, "[]")?;
                self.store.delete(keys::STREAK)?;
                self.store.delete(keys::HISTORY)?;
            }
        }
        Ok(())
    }
}
