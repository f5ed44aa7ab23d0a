use gitgud_core::{stats, Config, FileStore};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open()?;
    let config = Config::load(&store);
    let summary = stats::summary(&store, &config);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
