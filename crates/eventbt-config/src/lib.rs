//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BacktestSettings, DataSettings, LoggingConfig, SettingsError,
    StrategySettings,
};

use config::{Config, Environment, File, FileFormat};
use std::path::Path;

fn environment() -> Environment {
    Environment::with_prefix("EVENTBT")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("data.symbols")
        .try_parsing(true)
}

/// Load configuration from an optional file, then `EVENTBT__*` environment
/// overrides. Missing sections fall back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, SettingsError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    let config = builder.add_source(environment()).build()?;

    let settings: AppConfig = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

/// Parse configuration from TOML text, without environment overrides.
pub fn parse_config(contents: &str) -> Result<AppConfig, SettingsError> {
    let settings: AppConfig = Config::builder()
        .add_source(File::from_str(contents, FileFormat::Toml))
        .build()?
        .try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
