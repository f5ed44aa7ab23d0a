use clap::Subcommand;
use gitgud_core::{FileStore, ResetScope, TaskEngine};

#[derive(Subcommand)]
pub enum ResetCommand {
    /// Reset the request counter and drop any pending task
    Counter,
    /// Reset stats counters and the skip quota (keeps achievements)
    Stats,
    /// Reset everything: counter, stats, achievements, streak, history
    All,
}

pub fn run(scope: ResetCommand) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open()?;
    let engine = TaskEngine::new(&store);

    match scope {
        ResetCommand::Counter => {
            engine.reset(ResetScope::Counter)?;
            println!("counter reset");
        }
        ResetCommand::Stats => {
            engine.reset(ResetScope::Stats)?;
            println!("stats reset");
        }
        ResetCommand::All => {
            engine.reset(ResetScope::All)?;
            println!("full reset done");
        }
    }
    Ok(())
}
