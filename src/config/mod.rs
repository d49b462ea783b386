//! Tool configuration for the `tpconf` binary.
//!
//! ## config.kdl - Tool preferences
//!
//! Located at `$TPCONF_CONFIG_DIR/config.kdl`, or `~/.config/tpconf/config.kdl`
//! when the variable is unset.
//!
//! Contains:
//! - `data-dir` - Root of the settings layer files
//! - `data-module` - Default data module
//! - `template-dir` - Directory templates are read from
//! - `debug-dir` - Default directory for debug records
//! - `output-format` - "json" or "human"
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config.kdl > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_DIR_ENV, ConfigOverrides, Resolved, ResolvedConfig, ValueSource, config_file_path,
    resolve_config, resolve_config_with,
};
pub use schema::{OutputFormat, TpConfConfig};
