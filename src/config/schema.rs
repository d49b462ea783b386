//! KDL schema for config.kdl.
//!
//! This module provides:
//! - Rust structs representing the KDL schema
//! - Parsing and loading from KDL

use kdl::KdlDocument;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tool preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// data-dir "/etc/tpconf/data"
/// data-module "tinydata"
/// template-dir "/etc/tpconf/templates"
/// debug-dir "/tmp"
/// output-format "human"  // or "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpConfConfig {
    /// Root of the settings layer files
    pub data_dir: Option<String>,

    /// Data module used when an invocation doesn't name one
    pub data_module: Option<String>,

    /// Directory templates are read from
    pub template_dir: Option<String>,

    /// Directory debug records are written to
    pub debug_dir: Option<String>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,
}

impl TpConfConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown nodes are ignored. An unrecognized `output-format` is an error.
    pub fn from_kdl(doc: &KdlDocument) -> Result<Self, Error> {
        let mut config = Self::new();

        config.data_dir = get_string(doc, "data-dir");
        config.data_module = get_string(doc, "data-module");
        config.template_dir = get_string(doc, "template-dir");
        config.debug_dir = get_string(doc, "debug-dir");

        if let Some(format) = get_string(doc, "output-format") {
            config.output_format = Some(OutputFormat::parse(&format).ok_or_else(|| {
                Error::Config(format!(
                    "Invalid output-format '{}'. Expected 'json' or 'human'.",
                    format
                ))
            })?);
        }

        Ok(config)
    }

    /// Load config.kdl from `path`.
    ///
    /// A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let doc: KdlDocument = content.parse().map_err(|e| {
            Error::Config(format!("Failed to parse KDL in {}: {}", path.display(), e))
        })?;

        Self::from_kdl(&doc)
    }
}

/// Get a non-empty string argument from the first node named `name`.
fn get_string(doc: &KdlDocument, name: &str) -> Option<String> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_string())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
