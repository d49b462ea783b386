//! Per-application settings and the lookup seam that provides them.
//!
//! The resolver never reads data files itself. It asks a [`SettingsLookup`]
//! for the merged settings of one application in one data module and treats
//! the answer as read-only input. Two lookups ship with the crate:
//!
//! - [`StaticSettings`] - in-memory, for tests and embedding callers
//! - [`LayeredSettingsStore`] - KDL layer files selected by [`OsFacts`]

pub mod facts;
pub mod kdl;
pub mod layered;

pub use facts::OsFacts;
pub use layered::{LayeredLookup, LayeredSettingsStore};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::{Error, Result};

/// Well-known settings keys.
pub mod keys {
    pub const CONFIG_DIR_PATH: &str = "config_dir_path";
    pub const CONF_DIR_PATH: &str = "conf_dir_path";
    pub const DATA_DIR_PATH: &str = "data_dir_path";
    pub const LOG_DIR_PATH: &str = "log_dir_path";
    pub const SSL_DIR_PATH: &str = "ssl_dir_path";
    pub const CONFIG_FILE_PATH: &str = "config_file_path";
    pub const CONFIG_FILE_MODE: &str = "config_file_mode";
    pub const CONFIG_FILE_OWNER: &str = "config_file_owner";
    pub const CONFIG_FILE_GROUP: &str = "config_file_group";
    pub const PACKAGE_NAME: &str = "package_name";
    pub const SERVICE_NAME: &str = "service_name";
}

/// Merged settings dictionary of one application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDict(BTreeMap<String, Value>);

impl SettingsDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Scalar value of `key` as a string.
    ///
    /// Missing keys, nulls, empty strings and non-scalar values all read as
    /// `None`. Numbers and booleans are rendered with `to_string`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Overlay `other` on top of `self`, key by key.
    pub fn merge(&mut self, other: SettingsDict) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for SettingsDict {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Source of merged application settings.
///
/// Implementations own the merge semantics (which layers exist, which wins)
/// and any caching. `Ok(None)` means no data exists for the application.
pub trait SettingsLookup {
    fn lookup(&self, app: &str, data_module: &str) -> Result<Option<SettingsDict>>;
}

/// Fetch the settings of `app`, failing if the lookup has none.
pub fn resolve_settings(
    lookup: &dyn SettingsLookup,
    app: &str,
    data_module: &str,
) -> Result<SettingsDict> {
    lookup
        .lookup(app, data_module)?
        .ok_or_else(|| Error::SettingsNotFound {
            app: app.to_string(),
            data_module: data_module.to_string(),
        })
}

/// In-memory settings keyed by data module and application.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    entries: HashMap<(String, String), SettingsDict>,
}

impl StaticSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, data_module: &str, app: &str, settings: SettingsDict) {
        self.entries
            .insert((data_module.to_string(), app.to_string()), settings);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, data_module: &str, app: &str, settings: SettingsDict) -> Self {
        self.insert(data_module, app, settings);
        self
    }
}

impl SettingsLookup for StaticSettings {
    fn lookup(&self, app: &str, data_module: &str) -> Result<Option<SettingsDict>> {
        Ok(self
            .entries
            .get(&(data_module.to_string(), app.to_string()))
            .cloned())
    }
}
