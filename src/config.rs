use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub tests_dir: String,
    pub ignore_patterns: Vec<String>,
}

/// Load configuration from an optional `Config.toml`. Every key has a
/// default, so the tool runs with no configuration file at all.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("tests_dir", "tests")?
        .set_default(
            "ignore_patterns",
            vec!["__pycache__".to_string(), "*.pyc".to_string()],
        )?
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
