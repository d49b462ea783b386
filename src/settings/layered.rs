//! Layered, file-backed settings lookup.
//!
//! Settings for an application are read from KDL files in
//! `<data_dir>/<data_module>/<app>/`, merged from lowest to highest
//! precedence:
//!
//! 1. `default.kdl` - Defaults for every OS
//! 2. `<family>.kdl` - OS family (e.g. `Debian.kdl`)
//! 3. `<name>.kdl` - OS name (e.g. `Ubuntu.kdl`)
//! 4. `<name>-<major>.kdl` - OS release (e.g. `Ubuntu-22.kdl`)
//!
//! Later layers override earlier ones key by key. `app` and `data_module`
//! must each be a single path component, so lookups never leave `data_dir`.

use std::path::{Path, PathBuf};

use super::kdl::load_settings_file;
use super::{OsFacts, SettingsDict, SettingsLookup};
use crate::{Error, Result};

/// Merged settings together with the layer files that contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeredLookup {
    pub settings: SettingsDict,
    /// Contributing files, lowest precedence first
    pub sources: Vec<PathBuf>,
}

/// Settings lookup backed by per-OS KDL layer files.
#[derive(Debug, Clone)]
pub struct LayeredSettingsStore {
    data_dir: PathBuf,
    facts: OsFacts,
}

impl LayeredSettingsStore {
    pub fn new(data_dir: impl Into<PathBuf>, facts: OsFacts) -> Self {
        Self {
            data_dir: data_dir.into(),
            facts,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn facts(&self) -> &OsFacts {
        &self.facts
    }

    /// Directory holding the layer files of one application.
    pub fn app_dir(&self, app: &str, data_module: &str) -> PathBuf {
        self.data_dir.join(data_module).join(app)
    }

    /// Candidate layer files, lowest precedence first.
    pub fn layer_paths(&self, app: &str, data_module: &str) -> Vec<PathBuf> {
        let dir = self.app_dir(app, data_module);
        self.facts
            .layers()
            .into_iter()
            .map(|layer| dir.join(format!("{}.kdl", layer)))
            .collect()
    }

    /// Merge every existing layer file.
    ///
    /// Returns `Ok(None)` when no layer file exists for the application.
    pub fn lookup_with_sources(&self, app: &str, data_module: &str) -> Result<Option<LayeredLookup>> {
        check_component("application name", app)?;
        check_component("data module", data_module)?;

        let mut merged: Option<LayeredLookup> = None;

        for path in self.layer_paths(app, data_module) {
            let Some(layer) = load_settings_file(&path)? else {
                continue;
            };
            tracing::debug!(app, layer = %path.display(), keys = layer.len(), "merging settings layer");

            let result = merged.get_or_insert_with(|| LayeredLookup {
                settings: SettingsDict::new(),
                sources: Vec::new(),
            });
            result.settings.merge(layer);
            result.sources.push(path);
        }

        Ok(merged)
    }
}

/// Reject names that would escape their parent directory.
fn check_component(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(Error::InvalidInput(format!(
            "Invalid {} '{}': must be a single path component",
            kind, value
        )));
    }
    Ok(())
}

impl SettingsLookup for LayeredSettingsStore {
    fn lookup(&self, app: &str, data_module: &str) -> Result<Option<SettingsDict>> {
        Ok(self
            .lookup_with_sources(app, data_module)?
            .map(|found| found.settings))
    }
}
