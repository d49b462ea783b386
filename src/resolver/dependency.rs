//! Notify/require resolution.
//!
//! For each relationship:
//! - `Disabled` - no reference
//! - `AutoDerive` - `Service[<service_name>]` for notify,
//!   `Package[<package_name>]` for require, if the setting is non-empty
//! - `Explicit(r)` - `r` verbatim, or no reference if `r` is empty

use crate::models::{DependencyFlag, ResourceRef, non_empty};
use crate::settings::{SettingsDict, keys};

/// Resolved relationship targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub notify: Option<ResourceRef>,
    pub require: Option<ResourceRef>,
}

/// Compute the notify and require references for a file.
pub fn resolve_dependencies(
    notify: &DependencyFlag,
    require: &DependencyFlag,
    settings: &SettingsDict,
) -> Dependencies {
    Dependencies {
        notify: resolve_flag(notify, || {
            settings
                .get_string(keys::SERVICE_NAME)
                .map(|name| ResourceRef::service(&name))
        }),
        require: resolve_flag(require, || {
            settings
                .get_string(keys::PACKAGE_NAME)
                .map(|name| ResourceRef::package(&name))
        }),
    }
}

fn resolve_flag(
    flag: &DependencyFlag,
    derive: impl FnOnce() -> Option<ResourceRef>,
) -> Option<ResourceRef> {
    match flag {
        DependencyFlag::Disabled => None,
        DependencyFlag::AutoDerive => derive(),
        DependencyFlag::Explicit(reference) => {
            non_empty(Some(reference.as_str())).map(ResourceRef::new)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nginx() -> SettingsDict {
        SettingsDict::new()
            .with(keys::SERVICE_NAME, "nginx")
            .with(keys::PACKAGE_NAME, "nginx-full")
    }

    #[test]
    fn test_auto_derive_from_settings() {
        let deps = resolve_dependencies(
            &DependencyFlag::AutoDerive,
            &DependencyFlag::AutoDerive,
            &nginx(),
        );
        assert_eq!(deps.notify, Some(ResourceRef::service("nginx")));
        assert_eq!(deps.require, Some(ResourceRef::package("nginx-full")));
    }

    #[test]
    fn test_auto_derive_with_empty_service_name() {
        let settings = SettingsDict::new().with(keys::SERVICE_NAME, "");
        let deps = resolve_dependencies(
            &DependencyFlag::AutoDerive,
            &DependencyFlag::AutoDerive,
            &settings,
        );
        assert_eq!(deps, Dependencies::default());
    }

    #[test]
    fn test_explicit_reference_ignores_settings() {
        let deps = resolve_dependencies(
            &DependencyFlag::Explicit("Service[fe]".to_string()),
            &DependencyFlag::Explicit("Exec[apt-update]".to_string()),
            &nginx(),
        );
        assert_eq!(deps.notify.unwrap().as_str(), "Service[fe]");
        assert_eq!(deps.require.unwrap().as_str(), "Exec[apt-update]");
    }

    #[test]
    fn test_empty_explicit_reference_is_none() {
        let deps = resolve_dependencies(
            &DependencyFlag::Explicit(String::new()),
            &DependencyFlag::AutoDerive,
            &nginx(),
        );
        assert_eq!(deps.notify, None);
        assert_eq!(deps.require, Some(ResourceRef::package("nginx-full")));
    }

    #[test]
    fn test_disabled_is_always_none() {
        let deps = resolve_dependencies(
            &DependencyFlag::Disabled,
            &DependencyFlag::Disabled,
            &nginx(),
        );
        assert_eq!(deps, Dependencies::default());
    }

    #[test]
    fn test_flags_are_independent() {
        let deps = resolve_dependencies(
            &DependencyFlag::Disabled,
            &DependencyFlag::AutoDerive,
            &nginx(),
        );
        assert_eq!(deps.notify, None);
        assert_eq!(deps.require, Some(ResourceRef::package("nginx-full")));
    }
}
