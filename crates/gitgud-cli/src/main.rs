use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "gitgud", version, about = "GitGud CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Platform hook entry point (reads the prompt from stdin)
    Hook {
        /// Hook platform envelope to emit
        #[arg(long, value_enum, default_value = "claude")]
        platform: commands::hook::Platform,
    },
    /// Mark the pending task as completed
    Complete,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Activity, streak and achievement statistics
    Stats,
    /// Reset persisted state
    Reset {
        #[command(subcommand)]
        scope: commands::reset::ResetCommand,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Hook { platform } => commands::hook::run(platform),
        Commands::Complete => commands::complete::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::Reset { scope } => commands::reset::run(scope),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
