//! KDL parsing for settings layer files.
//!
//! # KDL Schema
//!
//! Each top-level node is one settings key:
//!
//! ```kdl
//! config_dir_path "/etc/ssh"
//! config_file_path "/etc/ssh/sshd_config"
//! config_file_mode "0600"
//! package_name "openssh-server"
//! service_name "sshd"
//!
//! // Several arguments become a list
//! tcp_port 22 2222
//!
//! // Children (or properties) become a map
//! docker_args {
//!     image "openssh"
//!     privileged #false
//! }
//! ```
//!
//! File modes should be quoted: `0600` without quotes is the integer 600.

use kdl::{KdlDocument, KdlNode, KdlValue};
use serde_json::{Map, Value};
use std::path::Path;

use super::SettingsDict;
use crate::Error;

/// Convert a parsed layer document into a settings dictionary.
///
/// A repeated top-level key keeps its last occurrence.
pub fn settings_from_kdl(doc: &KdlDocument) -> SettingsDict {
    doc.nodes()
        .iter()
        .map(|node| (node.name().value().to_string(), node_value(node)))
        .collect()
}

/// Read and parse one layer file.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_settings_file(path: &Path) -> Result<Option<SettingsDict>, Error> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Settings(format!("Failed to read {}: {}", path.display(), e)))?;

    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Settings(format!("Failed to parse KDL in {}: {}", path.display(), e)))?;

    Ok(Some(settings_from_kdl(&doc)))
}

/// Value of a single node.
fn node_value(node: &KdlNode) -> Value {
    if let Some(children) = node.children() {
        let mut map = Map::new();
        for child in children.nodes() {
            map.insert(child.name().value().to_string(), node_value(child));
        }
        return Value::Object(map);
    }

    let mut args = Vec::new();
    let mut props = Map::new();
    for entry in node.entries() {
        match entry.name() {
            Some(name) => {
                props.insert(name.value().to_string(), scalar(entry.value()));
            }
            None => args.push(scalar(entry.value())),
        }
    }

    if !props.is_empty() {
        return Value::Object(props);
    }

    match args.len() {
        0 => Value::Null,
        1 => args.remove(0),
        _ => Value::Array(args),
    }
}

fn scalar(value: &KdlValue) -> Value {
    match value {
        KdlValue::String(s) => Value::String(s.clone()),
        KdlValue::Integer(i) => match i64::try_from(*i) {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(i.to_string()),
        },
        KdlValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        KdlValue::Bool(b) => Value::Bool(*b),
        KdlValue::Null => Value::Null,
    }
}
