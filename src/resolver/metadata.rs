//! Mode and ownership resolution.

use crate::models::non_empty;
use crate::settings::{SettingsDict, keys};

/// Resolved file mode and ownership. `None` leaves the engine's default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    pub mode: Option<String>,
    pub owner: Option<String>,
    pub group: Option<String>,
}

/// Explicit overrides win, then the application's `config_file_*` settings.
pub fn resolve_metadata(
    mode: Option<&str>,
    owner: Option<&str>,
    group: Option<&str>,
    settings: &SettingsDict,
) -> FileMetadata {
    let pick = |explicit: Option<&str>, key: &str| -> Option<String> {
        non_empty(explicit)
            .map(str::to_string)
            .or_else(|| settings.get_string(key))
    };

    FileMetadata {
        mode: pick(mode, keys::CONFIG_FILE_MODE),
        owner: pick(owner, keys::CONFIG_FILE_OWNER),
        group: pick(group, keys::CONFIG_FILE_GROUP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SettingsDict {
        SettingsDict::new()
            .with(keys::CONFIG_FILE_MODE, "0644")
            .with(keys::CONFIG_FILE_OWNER, "root")
            .with(keys::CONFIG_FILE_GROUP, "wheel")
    }

    #[test]
    fn test_settings_fallback() {
        let meta = resolve_metadata(None, None, None, &settings());
        assert_eq!(meta.mode.as_deref(), Some("0644"));
        assert_eq!(meta.owner.as_deref(), Some("root"));
        assert_eq!(meta.group.as_deref(), Some("wheel"));
    }

    #[test]
    fn test_overrides_win_per_field() {
        let meta = resolve_metadata(Some("0600"), None, Some("ssh"), &settings());
        assert_eq!(meta.mode.as_deref(), Some("0600"));
        assert_eq!(meta.owner.as_deref(), Some("root"));
        assert_eq!(meta.group.as_deref(), Some("ssh"));
    }

    #[test]
    fn test_unset_when_neither_present() {
        let meta = resolve_metadata(None, None, None, &SettingsDict::new());
        assert_eq!(meta, FileMetadata::default());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let settings = SettingsDict::new().with(keys::CONFIG_FILE_OWNER, "");
        let meta = resolve_metadata(Some(""), None, None, &settings);
        assert_eq!(meta, FileMetadata::default());
    }
}
