//! Resolver output: the desired state of one managed file.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Ensure;

/// Opaque reference to another managed resource, e.g. `Service[sshd]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRef(String);

impl ResourceRef {
    /// Wrap a caller-supplied reference without interpreting it.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Reference to a package resource.
    pub fn package(name: &str) -> Self {
        Self(format!("Package[{}]", name))
    }

    /// Reference to a service resource.
    pub fn service(name: &str) -> Self {
        Self(format!("Service[{}]", name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully computed description of one configuration file, ready to hand to
/// a resource engine.
///
/// Unset optional fields are left to the engine's own defaults. At most one
/// of `source` and `content` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFileIntent {
    pub ensure: Ensure,

    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub require: Option<ResourceRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<ResourceRef>,
}

impl ResolvedFileIntent {
    /// A bare `ensure => present` file with literal content.
    pub fn present_with_content(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            ensure: Ensure::Present,
            path: path.into(),
            source: None,
            content: Some(content.into()),
            mode: None,
            owner: None,
            group: None,
            require: None,
            notify: None,
        }
    }
}

/// Everything one resolution produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConf {
    /// The managed configuration file
    pub file: ResolvedFileIntent,
    /// Diagnostic dump, present only when debugging was requested and the
    /// dump could be built
    pub debug: Option<ResolvedFileIntent>,
}
