//! Path resolution.
//!
//! Precedence (highest to lowest):
//! 1. Explicit `path` override, used verbatim
//! 2. `file` token joined onto the base directory selected by `base_dir`;
//!    leading separators are stripped so the file stays under that directory
//! 3. The application's main config file, `config_file_path`

use std::path::Path;

use crate::models::{BaseDir, non_empty};
use crate::settings::{SettingsDict, keys};
use crate::{Error, Result};

/// Compute the managed file's path.
pub fn resolve_path(
    app: &str,
    file: Option<&str>,
    base_dir: &BaseDir,
    explicit_path: Option<&str>,
    settings: &SettingsDict,
) -> Result<String> {
    if let Some(path) = non_empty(explicit_path) {
        return Ok(path.to_string());
    }

    let file = non_empty(file.map(|f| f.trim_start_matches(['/', '\\'])));
    let key = match file {
        Some(_) => base_dir.settings_key(),
        None => keys::CONFIG_FILE_PATH,
    };

    let setting = settings.get_string(key).ok_or_else(|| Error::MissingPath {
        app: app.to_string(),
        key,
    })?;

    match file {
        Some(file) => Ok(Path::new(&setting).join(file).to_string_lossy().into_owned()),
        None => Ok(setting),
    }
}
