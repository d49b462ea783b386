//! Operating system facts used to pick settings layers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default location of the os-release file.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Facts describing the host operating system.
///
/// Names follow the usual capitalized convention (`Debian`, `RedHat`,
/// `Ubuntu`), which is also how layer files are named.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsFacts {
    /// OS family, e.g. `Debian` or `RedHat`
    pub family: Option<String>,
    /// OS name, e.g. `Ubuntu`
    pub name: Option<String>,
    /// Major release, e.g. `22` for Ubuntu 22.04
    pub release_major: Option<String>,
}

impl OsFacts {
    /// Facts with no values; only the `default` layer is consulted.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Detect facts for the running host.
    ///
    /// Reads `/etc/os-release` when present, otherwise falls back to the
    /// compile-time target OS as both family and name.
    pub fn detect() -> Self {
        match Self::from_os_release_file(Path::new(OS_RELEASE_PATH)) {
            Some(facts) => facts,
            None => {
                let os = capitalize(std::env::consts::OS);
                Self {
                    family: Some(os.clone()),
                    name: Some(os),
                    release_major: None,
                }
            }
        }
    }

    /// Parse facts from an os-release file. Returns `None` if it can't be read.
    pub fn from_os_release_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Some(Self::from_os_release(&content))
    }

    /// Parse facts from os-release content.
    pub fn from_os_release(content: &str) -> Self {
        let fields = parse_os_release(content);

        let id = fields.get("ID").map(|s| s.to_lowercase());
        let id_like = fields
            .get("ID_LIKE")
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        let name = id.as_deref().map(os_name);
        let family = id
            .as_deref()
            .and_then(family_for)
            .or_else(|| id_like.split_whitespace().find_map(family_for))
            .map(str::to_string)
            .or_else(|| name.clone());
        let release_major = fields
            .get("VERSION_ID")
            .and_then(|v| v.split('.').next())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            family,
            name,
            release_major,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_release_major(mut self, release: impl Into<String>) -> Self {
        self.release_major = Some(release.into());
        self
    }

    /// Layer names from lowest to highest precedence, without duplicates.
    pub fn layers(&self) -> Vec<String> {
        let mut layers = vec!["default".to_string()];
        let mut push = |layer: String| {
            if !layers.contains(&layer) {
                layers.push(layer);
            }
        };

        if let Some(ref family) = self.family {
            push(family.clone());
        }
        if let Some(ref name) = self.name {
            push(name.clone());
            if let Some(ref release) = self.release_major {
                push(format!("{}-{}", name, release));
            }
        }

        layers
    }
}

/// Parse `KEY=value` lines, stripping optional quotes.
fn parse_os_release(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (key.trim().to_string(), value.to_string())
        })
        .collect()
}

fn family_for(id: &str) -> Option<&'static str> {
    match id {
        "debian" | "ubuntu" | "linuxmint" | "raspbian" => Some("Debian"),
        "rhel" | "centos" | "fedora" | "rocky" | "almalinux" | "ol" | "amzn" => Some("RedHat"),
        "suse" | "sles" | "opensuse" | "opensuse-leap" | "opensuse-tumbleweed" => Some("Suse"),
        "arch" | "manjaro" => Some("Archlinux"),
        "alpine" => Some("Alpine"),
        "gentoo" => Some("Gentoo"),
        _ => None,
    }
}

fn os_name(id: &str) -> String {
    match id {
        "rhel" => "RedHat".to_string(),
        "centos" => "CentOS".to_string(),
        "sles" => "SLES".to_string(),
        "opensuse-leap" | "opensuse-tumbleweed" | "opensuse" => "OpenSuSE".to_string(),
        "amzn" => "Amazon".to_string(),
        "ol" => "OracleLinux".to_string(),
        "almalinux" => "AlmaLinux".to_string(),
        "arch" => "Archlinux".to_string(),
        other => capitalize(other),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
