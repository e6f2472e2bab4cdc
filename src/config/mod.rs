//! Configuration module for sheetforge.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, OutputSettings, RunSettings, Settings, SettingsError, SettingsResult,
    CONFIG_ENV_VAR,
};
