pub mod chat;
pub mod config;
pub mod correct;
pub mod history;
pub mod onboarding;
pub mod simulate;
pub mod stats;
pub mod themes;

use redacta_core::{App, Config, GeminiClient, StateStore};

/// Open the on-disk store and load application state + configuration.
pub fn open_app() -> Result<(App, Config), Box<dyn std::error::Error>> {
    let store = StateStore::open()?;
    let config = Config::load()?;
    Ok((App::load(store), config))
}

/// Build the real gateway from configuration (API key from env).
pub fn gateway(config: &Config) -> Result<GeminiClient, Box<dyn std::error::Error>> {
    Ok(GeminiClient::new(&config.gateway)?)
}
