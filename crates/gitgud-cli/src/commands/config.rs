use clap::Subcommand;
use gitgud_core::{Config, FileStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "frequency", "daily_skips")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Describe the valid keys and their constraints
    Schema,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open()?;

    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(&store);
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(&store);
            let applied = config.set(&store, &key, &value)?;
            println!("{key} set to: {applied}");
        }
        ConfigAction::List => {
            let config = Config::load(&store);
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Schema => {
            for (key, description) in Config::schema() {
                println!("{key:<12} {description}");
            }
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save(&store)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
