//! Resolver input: one configuration-file declaration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::Error;

/// Data module used when the caller does not name one.
pub const DEFAULT_DATA_MODULE: &str = "tinydata";

/// Directory debug records are written to when the caller does not name one.
pub const DEFAULT_DEBUG_DIR: &str = "/tmp";

/// Opaque options forwarded verbatim to template rendering.
pub type OptionsHash = BTreeMap<String, serde_json::Value>;

/// Desired presence of the managed file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

impl Ensure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ensure::Present => "present",
            Ensure::Absent => "absent",
        }
    }
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Ensure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Ensure::Present),
            "absent" => Ok(Ensure::Absent),
            _ => Err(Error::InvalidEnsure(s.to_string())),
        }
    }
}

/// Directory category a `file` token is placed under.
///
/// Unknown categories are kept as `Other` rather than rejected; they resolve
/// against `config_dir_path` like `Config` does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BaseDir {
    #[default]
    Config,
    Conf,
    Data,
    Log,
    Ssl,
    Other(String),
}

impl BaseDir {
    /// Parse a category name. Never fails; see [`BaseDir::Other`].
    pub fn parse(s: &str) -> Self {
        match s {
            "config" => BaseDir::Config,
            "conf" => BaseDir::Conf,
            "data" => BaseDir::Data,
            "log" => BaseDir::Log,
            "ssl" => BaseDir::Ssl,
            other => BaseDir::Other(other.to_string()),
        }
    }

    /// Settings key holding this category's directory.
    pub fn settings_key(&self) -> &'static str {
        match self {
            BaseDir::Config | BaseDir::Other(_) => "config_dir_path",
            BaseDir::Conf => "conf_dir_path",
            BaseDir::Data => "data_dir_path",
            BaseDir::Log => "log_dir_path",
            BaseDir::Ssl => "ssl_dir_path",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BaseDir::Config => "config",
            BaseDir::Conf => "conf",
            BaseDir::Data => "data",
            BaseDir::Log => "log",
            BaseDir::Ssl => "ssl",
            BaseDir::Other(s) => s,
        }
    }
}

impl fmt::Display for BaseDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the file's content comes from.
///
/// At most one field may be set; the content resolver rejects anything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSource {
    /// Reference to a file served as-is by the resource engine
    pub source: Option<String>,
    /// Legacy template, rendered with options bound as a variable
    pub template: Option<String>,
    /// Structured template, rendered with options bound as parameters
    pub epp: Option<String>,
    /// Literal content
    pub content: Option<String>,
}

/// Tri-state control for the notify/require relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DependencyFlag {
    /// No relationship
    Disabled,
    /// Derive the reference from settings (`service_name` / `package_name`)
    #[default]
    AutoDerive,
    /// Use this resource reference verbatim
    Explicit(String),
}

impl std::str::FromStr for DependencyFlag {
    type Err = Error;

    /// Command-line form: `true`, `false`, empty, or a resource reference.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "false" => DependencyFlag::Disabled,
            "true" => DependencyFlag::AutoDerive,
            reference => DependencyFlag::Explicit(reference.to_string()),
        })
    }
}

/// One configuration-file declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// `app` or `app::file`
    pub title: String,
    pub ensure: Ensure,
    pub content: ContentSource,
    pub base_dir: BaseDir,
    pub path: Option<String>,
    pub mode: Option<String>,
    pub owner: Option<String>,
    pub group: Option<String>,
    pub notify: DependencyFlag,
    pub require: DependencyFlag,
    pub options: OptionsHash,
    pub debug: bool,
    pub debug_dir: String,
    pub data_module: String,
}

impl Invocation {
    /// Create a declaration with default settings for everything but the title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ensure: Ensure::default(),
            content: ContentSource::default(),
            base_dir: BaseDir::default(),
            path: None,
            mode: None,
            owner: None,
            group: None,
            notify: DependencyFlag::default(),
            require: DependencyFlag::default(),
            options: OptionsHash::new(),
            debug: false,
            debug_dir: DEFAULT_DEBUG_DIR.to_string(),
            data_module: DEFAULT_DATA_MODULE.to_string(),
        }
    }

    pub fn with_ensure(mut self, ensure: Ensure) -> Self {
        self.ensure = ensure;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.content.source = Some(source.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.content.template = Some(template.into());
        self
    }

    pub fn with_epp(mut self, epp: impl Into<String>) -> Self {
        self.content.epp = Some(epp.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content.content = Some(content.into());
        self
    }

    pub fn with_base_dir(mut self, base_dir: BaseDir) -> Self {
        self.base_dir = base_dir;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_notify(mut self, notify: DependencyFlag) -> Self {
        self.notify = notify;
        self
    }

    pub fn with_require(mut self, require: DependencyFlag) -> Self {
        self.require = require;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn with_debug(mut self, debug_dir: impl Into<String>) -> Self {
        self.debug = true;
        self.debug_dir = debug_dir.into();
        self
    }

    pub fn with_data_module(mut self, data_module: impl Into<String>) -> Self {
        self.data_module = data_module.into();
        self
    }
}
