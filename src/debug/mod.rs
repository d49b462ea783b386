//! Diagnostic dumps of a resolution.
//!
//! When an invocation asks for debugging, a second file intent is produced
//! at `<debug_dir>/tp_conf_debug_<title>`. Its content is the resolved file
//! intent followed by a snapshot of the caller's scope with sensitive keys
//! removed. Building or writing the dump is best-effort: failures are logged
//! and never affect the primary intent.

use regex::RegexSet;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::OnceLock;

use crate::Result;
use crate::models::ResolvedFileIntent;

/// File name prefix of debug records.
pub const DEBUG_FILE_PREFIX: &str = "tp_conf_debug_";

/// Key patterns excluded from scope snapshots (case-insensitive).
pub const SENSITIVE_KEY_PATTERNS: &[&str] = &[
    r"(?i)^uptime",
    r"(?i)^path$",
    r"(?i)^timestamp$",
    r"(?i)^free$",
    r"(?i)password",
];

/// Provides the caller's evaluation context for debug dumps.
pub trait ScopeSnapshot {
    fn current_scope(&self) -> Result<BTreeMap<String, String>>;
}

/// Scope snapshot of the process environment. Non-UTF-8 variables are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvScope;

impl ScopeSnapshot for EnvScope {
    fn current_scope(&self) -> Result<BTreeMap<String, String>> {
        Ok(std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect())
    }
}

fn sensitive_keys() -> &'static RegexSet {
    static SENSITIVE: OnceLock<RegexSet> = OnceLock::new();
    SENSITIVE.get_or_init(|| {
        RegexSet::new(SENSITIVE_KEY_PATTERNS).expect("sensitive key patterns are valid")
    })
}

/// Check whether a scope key must be left out of dumps.
pub fn is_sensitive_key(key: &str) -> bool {
    sensitive_keys().is_match(key)
}

/// Drop sensitive keys from a scope snapshot.
pub fn filter_scope(scope: BTreeMap<String, String>) -> BTreeMap<String, String> {
    scope
        .into_iter()
        .filter(|(key, _)| !is_sensitive_key(key))
        .collect()
}

/// Path of the debug record for `title`.
///
/// Path separators in the title are replaced so the record is always a
/// single file directly inside `debug_dir`.
pub fn debug_record_path(debug_dir: &str, title: &str) -> String {
    let name = format!("{}{}", DEBUG_FILE_PREFIX, title.replace(['/', '\\'], "_"));
    Path::new(debug_dir)
        .join(name)
        .to_string_lossy()
        .into_owned()
}

/// Text dump of an intent and a (filtered) scope.
pub fn render_dump(
    title: &str,
    intent: &ResolvedFileIntent,
    scope: &BTreeMap<String, String>,
) -> Result<String> {
    let mut dump = String::new();
    let _ = writeln!(dump, "# tpconf debug: {}", title);
    let _ = writeln!(dump);
    let _ = writeln!(dump, "## Resolved file");
    let _ = writeln!(dump, "{}", serde_json::to_string_pretty(intent)?);
    let _ = writeln!(dump);
    let _ = writeln!(dump, "## Scope");
    for (key, value) in scope {
        let _ = writeln!(dump, "{} = {}", key, value);
    }
    Ok(dump)
}

/// Build the debug record for a resolved intent.
pub fn build_debug_record(
    title: &str,
    debug_dir: &str,
    intent: &ResolvedFileIntent,
    scope: &dyn ScopeSnapshot,
) -> Result<ResolvedFileIntent> {
    let snapshot = filter_scope(scope.current_scope()?);
    let dump = render_dump(title, intent, &snapshot)?;
    Ok(ResolvedFileIntent::present_with_content(
        debug_record_path(debug_dir, title),
        dump,
    ))
}

/// Best-effort [`build_debug_record`]: failures are logged and yield `None`.
pub fn emit_debug_record(
    title: &str,
    debug_dir: &str,
    intent: &ResolvedFileIntent,
    scope: &dyn ScopeSnapshot,
) -> Option<ResolvedFileIntent> {
    match build_debug_record(title, debug_dir, intent, scope) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(title, error = %e, "failed to build debug record");
            None
        }
    }
}

/// Write a debug record to disk.
///
/// This function never fails; errors are logged and reported as `false`.
pub fn write_debug_record(record: &ResolvedFileIntent) -> bool {
    let path = Path::new(&record.path);
    let result = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|_| std::fs::write(path, record.content.as_deref().unwrap_or_default()));

    match result {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "wrote debug record");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to write debug record");
            false
        }
    }
}
