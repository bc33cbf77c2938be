use clap::Subcommand;
use redacta_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show every configuration value
    List,
    /// Read one dotted key (e.g. gateway.model)
    Get { key: String },
    /// Write one dotted key
    Set { key: String, value: String },
}

const KEYS: [&str; 7] = [
    "gateway.model",
    "gateway.endpoint",
    "gateway.timeout_secs",
    "gateway.temperature",
    "simulation.question_count",
    "simulation.subjects",
    "essay.min_length",
];

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::List => {
            let config = Config::load()?;
            for key in KEYS {
                println!("{key} = {}", config.get(key)?);
            }
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("{key} = {}", config.get(&key)?);
        }
    }
    Ok(())
}
