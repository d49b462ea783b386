//! Precedence resolution for tool configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`TPCONF_DATA_DIR`, ...)
//! 3. config.kdl (`$TPCONF_CONFIG_DIR/config.kdl` or `~/.config/tpconf/config.kdl`)
//! 4. Built-in defaults

use std::path::PathBuf;

use super::schema::{OutputFormat, TpConfConfig};
use crate::Result;
use crate::models::{DEFAULT_DATA_MODULE, DEFAULT_DEBUG_DIR};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "TPCONF_CONFIG_DIR";
pub const DATA_DIR_ENV: &str = "TPCONF_DATA_DIR";
pub const DATA_MODULE_ENV: &str = "TPCONF_DATA_MODULE";
pub const TEMPLATE_DIR_ENV: &str = "TPCONF_TEMPLATE_DIR";
pub const DEBUG_DIR_ENV: &str = "TPCONF_DEBUG_DIR";

pub const DEFAULT_DATA_DIR: &str = "/etc/tpconf/data";
pub const DEFAULT_TEMPLATE_DIR: &str = "/etc/tpconf/templates";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from a config.kdl file
    ConfigFile(PathBuf),
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile(path) => write!(f, "config:{}", path.display()),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub data_dir: Resolved<PathBuf>,
    pub data_module: Resolved<String>,
    pub template_dir: Resolved<PathBuf>,
    pub debug_dir: Resolved<String>,
    pub output_format: Resolved<OutputFormat>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            data_dir: Resolved::new(PathBuf::from(DEFAULT_DATA_DIR), ValueSource::Default),
            data_module: Resolved::new(DEFAULT_DATA_MODULE.to_string(), ValueSource::Default),
            template_dir: Resolved::new(
                PathBuf::from(DEFAULT_TEMPLATE_DIR),
                ValueSource::Default,
            ),
            debug_dir: Resolved::new(DEFAULT_DEBUG_DIR.to_string(), ValueSource::Default),
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
        }
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub data_module: Option<String>,
    pub template_dir: Option<PathBuf>,
    pub debug_dir: Option<String>,
    pub output_format: Option<OutputFormat>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_data_module(mut self, module: impl Into<String>) -> Self {
        self.data_module = Some(module.into());
        self
    }

    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    pub fn with_debug_dir(mut self, dir: impl Into<String>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Location of config.kdl.
///
/// `TPCONF_CONFIG_DIR` wins over the platform config directory.
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir).join("config.kdl"));
    }
    dirs::config_dir().map(|d| d.join("tpconf").join("config.kdl"))
}

/// Resolve configuration from the process environment and config.kdl.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let path = config_file_path();
    let file = match path {
        Some(ref p) => TpConfConfig::load(p)?,
        None => TpConfConfig::new(),
    };

    Ok(resolve_config_with(
        overrides,
        |name| std::env::var(name).ok(),
        &file,
        path,
    ))
}

/// Resolve configuration from explicit inputs.
///
/// `env` looks up an environment variable; empty values count as unset.
/// `file_path` is only used to label values coming from `file`.
pub fn resolve_config_with(
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
    file: &TpConfConfig,
    file_path: Option<PathBuf>,
) -> ResolvedConfig {
    let mut result = ResolvedConfig::default();
    let file_source = || ValueSource::ConfigFile(file_path.clone().unwrap_or_default());
    let env_var = |name: &str| env(name).filter(|v| !v.is_empty());

    // Resolve data_dir
    if let Some(ref dir) = overrides.data_dir {
        result.data_dir = Resolved::new(dir.clone(), ValueSource::CliFlag);
    } else if let Some(dir) = env_var(DATA_DIR_ENV) {
        result.data_dir = Resolved::new(dir.into(), ValueSource::EnvVar(DATA_DIR_ENV.into()));
    } else if let Some(ref dir) = file.data_dir {
        result.data_dir = Resolved::new(dir.into(), file_source());
    }

    // Resolve data_module
    if let Some(ref module) = overrides.data_module {
        result.data_module = Resolved::new(module.clone(), ValueSource::CliFlag);
    } else if let Some(module) = env_var(DATA_MODULE_ENV) {
        result.data_module =
            Resolved::new(module, ValueSource::EnvVar(DATA_MODULE_ENV.into()));
    } else if let Some(ref module) = file.data_module {
        result.data_module = Resolved::new(module.clone(), file_source());
    }

    // Resolve template_dir
    if let Some(ref dir) = overrides.template_dir {
        result.template_dir = Resolved::new(dir.clone(), ValueSource::CliFlag);
    } else if let Some(dir) = env_var(TEMPLATE_DIR_ENV) {
        result.template_dir =
            Resolved::new(dir.into(), ValueSource::EnvVar(TEMPLATE_DIR_ENV.into()));
    } else if let Some(ref dir) = file.template_dir {
        result.template_dir = Resolved::new(dir.into(), file_source());
    }

    // Resolve debug_dir
    if let Some(ref dir) = overrides.debug_dir {
        result.debug_dir = Resolved::new(dir.clone(), ValueSource::CliFlag);
    } else if let Some(dir) = env_var(DEBUG_DIR_ENV) {
        result.debug_dir = Resolved::new(dir, ValueSource::EnvVar(DEBUG_DIR_ENV.into()));
    } else if let Some(ref dir) = file.debug_dir {
        result.debug_dir = Resolved::new(dir.clone(), file_source());
    }

    // Resolve output_format (no env var)
    if let Some(ref format) = overrides.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::CliFlag);
    } else if let Some(ref format) = file.output_format {
        result.output_format = Resolved::new(format.clone(), file_source());
    }

    result
}
