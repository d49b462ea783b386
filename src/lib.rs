//! tpconf - Resolve application configuration files into declarative file intents.
//!
//! Given a title such as `openssh` or `openssh::ssh_config`, a sparse set of
//! caller overrides and a merged, OS-aware settings dictionary, this library
//! computes the path, content, mode, ownership and dependency references of
//! a managed configuration file. Enforcing the result is left to whatever
//! resource engine consumes the [`models::ResolvedFileIntent`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod debug;
pub mod models;
pub mod render;
pub mod resolver;
pub mod settings;

pub use models::{Invocation, ResolvedConf, ResolvedFileIntent};
pub use resolver::ConfResolver;


/// Library-level error type for tpconf operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid title '{0}': application name must not be empty")]
    InvalidTitle(String),

    #[error("Invalid ensure value '{0}': expected 'present' or 'absent'")]
    InvalidEnsure(String),

    #[error("No settings found for '{app}' in data module '{data_module}'")]
    SettingsNotFound { app: String, data_module: String },

    #[error("No path for '{app}': no explicit path given and setting '{key}' is empty")]
    MissingPath { app: String, key: &'static str },

    #[error("Conflicting content sources: {} (set at most one)", .0.join(", "))]
    ConflictingContentSource(Vec<&'static str>),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Template error: {0}")]
    Render(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for tpconf operations.
pub type Result<T> = std::result::Result<T, Error>;
