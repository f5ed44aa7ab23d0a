//! Platform hook adapters.
//!
//! Reads the platform's stdin JSON (`{"prompt": ...}`), runs the engine,
//! and renders the resulting action into the platform envelope. The core
//! never sees the envelope shape.
//!
//! Claude hooks inject context through `hookSpecificOutput`; emitting
//! nothing means "proceed normally". Cursor's hook protocol only supports
//! `{"continue": bool}`, so that adapter always continues and leaves the
//! pending-task state on disk for the platform rule to read.

use std::io::Read;

use clap::ValueEnum;
use gitgud_core::{Action, Config, FileStore, TaskEngine};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Platform {
    Claude,
    Cursor,
}

#[derive(Deserialize)]
struct HookInput {
    #[serde(default)]
    prompt: String,
}

pub fn run(platform: Platform) -> Result<(), Box<dyn std::error::Error>> {
    // An internal fault must never block the assistant: fall back to the
    // platform's continue envelope instead of failing the hook.
    let action = process_stdin().unwrap_or(Action::Continue);

    match platform {
        Platform::Claude => {
            if let Some(context) = additional_context(&action) {
                let envelope = json!({
                    "hookSpecificOutput": {
                        "hookEventName": "UserPromptSubmit",
                        "additionalContext": context,
                    }
                });
                println!("{envelope}");
            }
        }
        Platform::Cursor => {
            println!("{}", json!({ "continue": true }));
        }
    }
    Ok(())
}

fn process_stdin() -> Option<Action> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input).ok()?;
    let prompt = serde_json::from_str::<HookInput>(&input).ok()?.prompt;

    let store = FileStore::open().ok()?;
    let config = Config::load(&store);
    let mut engine = TaskEngine::new(&store);
    Some(engine.process_prompt(&prompt, &config))
}

/// Instruction block for the assistant, `None` when flow continues
/// silently.
fn additional_context(action: &Action) -> Option<String> {
    match action {
        Action::Continue => None,
        Action::SkipUsed {
            remaining_skips,
            max_skips,
        } => Some(format!(
            "🃏 SKIP USED!\n\n\
             The user chose to skip the pending exercise.\n\
             Skips remaining today: {remaining_skips}/{max_skips}\n\n\
             Proceed normally with the user's request, and tell the user a \
             skip was spent and how many remain."
        )),
        Action::SkipDenied { max_skips } => Some(format!(
            "⛔ NO SKIPS LEFT!\n\n\
             All {max_skips} skips are used for today, so the pending \
             exercise still stands. Remind the user to complete it \
             (then run: gitgud complete)."
        )),
        Action::PendingTask {
            task,
            remaining_skips,
            max_skips,
        } => Some(format!(
            "🎮 GITGUD ACTIVE!\n\n\
             📋 PENDING EXERCISE:\n{task}\n\n\
             ⛔ MANDATORY INSTRUCTIONS:\n\
             1. DO NOT write code or provide implementations\n\
             2. DO NOT give snippets to copy\n\
             3. You may only answer conceptual questions, point at \
             documentation, confirm an approach, or give high-level hints\n\n\
             🃏 Skips available: {remaining_skips}/{max_skips} (say 'skip' to skip)\n\
             ✅ When done: gitgud complete\n\n\
             Remind the user of the exercise and the options."
        )),
        Action::NewTask {
            task,
            request_number,
            remaining_skips,
            max_skips,
            current_streak,
            ..
        } => Some(format!(
            "🎮 GITGUD - NEW CHALLENGE!\n\n\
             Request #{request_number} - time to git gud!\n\
             🔥 Current streak: {current_streak} days\n\n\
             📋 THE EXERCISE:\n{task}\n\n\
             ⛔ INSTRUCTIONS:\n\
             1. DON'T write the code - the user must do it\n\
             2. Present the exercise clearly and explain why it is useful \
             for the original request\n\
             3. Suggest documentation and give high-level hints on request\n\n\
             🃏 Skips available: {remaining_skips}/{max_skips} (the user can say 'skip')\n\
             ✅ When done: gitgud complete\n\n\
             Present the challenge to the user!"
        )),
    }
}
