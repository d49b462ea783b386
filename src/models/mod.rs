//! Data models for configuration-file resolution.
//!
//! This module defines the resolver's inputs and outputs:
//! - `Invocation` - One configuration-file declaration with caller overrides
//! - `DependencyFlag` - Tri-state notify/require control
//! - `ResolvedFileIntent` - Fully computed desired state of one file
//! - `ResourceRef` - Reference to another managed resource (package, service)

pub mod intent;
pub mod invocation;

pub use intent::{ResolvedConf, ResolvedFileIntent, ResourceRef};
pub use invocation::{
    BaseDir, ContentSource, DEFAULT_DEBUG_DIR, DEFAULT_DATA_MODULE, DependencyFlag, Ensure,
    Invocation, OptionsHash,
};

/// Treat `Some("")` the same as `None`.
///
/// Callers and data files use empty strings to mean "not set", so every
/// precedence rule in the resolver goes through this helper.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
