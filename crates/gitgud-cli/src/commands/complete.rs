//! Completion flow: streak transition, achievement unlocks, stats.

use gitgud_core::{CompletionOutcome, Config, FileStore, TaskEngine};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open()?;
    let config = Config::load(&store);
    let engine = TaskEngine::new(&store);

    match engine.complete(&config)? {
        CompletionOutcome::NothingPending => {
            println!("No pending task to complete.");
        }
        CompletionOutcome::Completed {
            streak,
            unlocked,
            stats,
            next_task_in,
            remaining_skips,
            max_skips,
        } => {
            println!("✅ Task completed!");
            println!();

            if !unlocked.is_empty() {
                println!("🏅 Achievement unlocked!");
                for badge in &unlocked {
                    println!("   {} {}", badge.emoji, badge.name);
                }
                println!();
            }

            println!("🔥 Streak: {} days", streak.current);
            if streak.is_new_record {
                println!("   ⭐ New personal record!");
            } else {
                println!("   📈 Record: {} days", streak.best);
            }
            println!();

            println!("📊 Stats:");
            println!("   Completed: {}", stats.completed);
            println!("   Skipped: {}", stats.skipped);
            if stats.total_assigned > 0 {
                println!("   Completion rate: {}%", stats.completion_rate());
            }
            println!();
            println!("📍 Next task in: {next_task_in} requests");
            println!("🃏 Skips left today: {remaining_skips}/{max_skips}");
        }
    }
    Ok(())
}
