use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::CityMatchMode;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub airtable: AirtableSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_openai_endpoint(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_openai_endpoint() -> String { "https://api.openai.com/v1".to_string() }
fn default_model() -> String { "gpt-4".to_string() }
fn default_temperature() -> f32 { 0.3 }
fn default_timeout_secs() -> u64 { 30 }

/// Which backend supplies the place directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Airtable,
    File,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetSettings {
    #[serde(default)]
    pub source: SourceKind,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirtableSettings {
    #[serde(default = "default_airtable_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub base_id: String,
    #[serde(default = "default_table_name")]
    pub table_name: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for AirtableSettings {
    fn default() -> Self {
        Self {
            endpoint: default_airtable_endpoint(),
            token: String::new(),
            base_id: String::new(),
            table_name: default_table_name(),
            timeout_secs: default_timeout_secs(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_airtable_endpoint() -> String { "https://api.airtable.com/v0".to_string() }
fn default_table_name() -> String { "Places".to_string() }
fn default_max_pages() -> usize { 200 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub city_mode: CityMatchMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ATTACHE_)
    /// 5. OPENAI_API_KEY / AIRTABLE_TOKEN
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ATTACHE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ATTACHE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ATTACHE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional secret variables on top of loaded config.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = env::var("OPENAI_API_KEY") {
        builder = builder.set_override("openai.api_key", api_key)?;
    }
    if let Ok(token) = env::var("AIRTABLE_TOKEN") {
        builder = builder.set_override("airtable.token", token)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.openai.model, "gpt-4");
        assert_eq!(settings.openai.temperature, 0.3);
        assert_eq!(settings.airtable.table_name, "Places");
        assert_eq!(settings.dataset.source, SourceKind::Airtable);
        assert_eq!(settings.matching.city_mode, CityMatchMode::Contains);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "compact");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[dataset]
source = "file"
path = "data/places.json"

[matching]
city_mode = "exact"
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.dataset.source, SourceKind::File);
        assert_eq!(settings.dataset.path, Some(PathBuf::from("data/places.json")));
        assert_eq!(settings.matching.city_mode, CityMatchMode::Exact);
        assert_eq!(settings.airtable.max_pages, 200);
    }
}
