//! TOML-based configuration for sheetforge.
//!
//! Supports a config file (sheetforge.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [output]
//! dir = "${BUILD_DIR}/generated"
//! package = "models"
//! db_name = "app.db"
//! clean = true
//!
//! [run]
//! workers = 4
//! exporters = ["sqlite", "rust"]
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SHEETFORGE_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Where and how generated artifacts are written.
    pub output: OutputSettings,

    /// Generator run configuration.
    pub run: RunSettings,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output root; each exporter writes into `<dir>/<exporter>`.
    /// Supports ${ENV_VAR} expansion.
    pub dir: String,

    /// Package / module name used by exporters.
    pub package: String,

    /// SQLite database file name.
    pub db_name: String,

    /// Remove the output directory before a run.
    pub clean: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: "generated".to_string(),
            package: "models".to_string(),
            db_name: "app.db".to_string(),
            clean: true,
        }
    }
}

impl OutputSettings {
    /// Get the output directory with environment variables expanded.
    pub fn resolved_dir(&self) -> SettingsResult<PathBuf> {
        expand_env_vars(&self.dir).map(PathBuf::from)
    }
}

/// Run configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunSettings {
    /// Worker pool size.
    pub workers: usize,

    /// Exporters to run, by registry name.
    pub exporters: Vec<String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            workers: 4,
            exporters: vec!["sqlite".to_string(), "rust".to_string()],
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SHEETFORGE_CONFIG`
    /// 2. `./sheetforge.toml`
    /// 3. `~/.config/sheetforge/config.toml`
    pub fn load() -> SettingsResult<Self> {
        // Check environment variable first
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        // Check local directory
        let local_config = PathBuf::from("sheetforge.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sheetforge").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// Reject values no run can work with.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.run.workers == 0 {
            return Err(SettingsError::InvalidConfig(
                "run.workers must be at least 1".to_string(),
            ));
        }
        if self.output.db_name.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "output.db_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> SettingsResult<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            // $VAR (ends at non-alphanumeric/underscore)
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
