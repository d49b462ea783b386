//! Template rendering seam.
//!
//! The resolver hands templates and the caller's options to a
//! [`TemplateRenderer`] and never looks inside the options itself.
//! [`FileTemplateRenderer`] is the small placeholder renderer used by the
//! `tpconf` binary; embedding callers plug in their own engine.

use regex::{Captures, Regex};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::models::OptionsHash;
use crate::{Error, Result};

/// Renders templates with the caller's options.
pub trait TemplateRenderer {
    /// Render a legacy template, with the options bound as a variable.
    fn render_legacy(&self, template: &str, options: &OptionsHash) -> Result<String>;

    /// Render a structured template, with the options bound as parameters.
    fn render_structured(&self, template: &str, options: &OptionsHash) -> Result<String>;
}

/// Placeholder renderer reading templates from a directory.
///
/// Legacy templates reference options through the bound variable,
/// `{{ options.Port }}`; structured templates reference them directly as
/// parameters, `{{ Port }}`. String values render unquoted, other scalars
/// bare, maps and lists as compact JSON.
#[derive(Debug, Clone)]
pub struct FileTemplateRenderer {
    template_dir: PathBuf,
}

impl FileTemplateRenderer {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
        }
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    fn read_template(&self, template: &str) -> Result<String> {
        let path = self.template_dir.join(template);
        std::fs::read_to_string(&path)
            .map_err(|e| Error::Render(format!("Failed to read {}: {}", path.display(), e)))
    }
}

impl TemplateRenderer for FileTemplateRenderer {
    fn render_legacy(&self, template: &str, options: &OptionsHash) -> Result<String> {
        let body = self.read_template(template)?;
        substitute(&body, template, options, Some("options"))
    }

    fn render_structured(&self, template: &str, options: &OptionsHash) -> Result<String> {
        let body = self.read_template(template)?;
        substitute(&body, template, options, None)
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)?)\s*\}\}")
            .expect("placeholder regex is valid")
    })
}

/// Replace every placeholder in `body`.
///
/// With `binding` set, placeholders must be `<binding>.<key>`; without it,
/// they must be a bare `<key>`.
fn substitute(
    body: &str,
    template: &str,
    options: &OptionsHash,
    binding: Option<&str>,
) -> Result<String> {
    let mut missing: Option<String> = None;

    let rendered = placeholder_regex().replace_all(body, |caps: &Captures| {
        let expr = &caps[1];
        let key = match (binding, expr.split_once('.')) {
            (Some(var), Some((head, key))) if head == var => Some(key),
            (None, None) => Some(expr),
            _ => None,
        };

        match key.and_then(|k| options.get(k)) {
            Some(value) => render_value(value),
            None => {
                missing.get_or_insert_with(|| expr.to_string());
                String::new()
            }
        }
    });

    if let Some(expr) = missing {
        return Err(Error::Render(format!(
            "Unknown placeholder '{}' in template {}",
            expr, template
        )));
    }

    Ok(rendered.into_owned())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
