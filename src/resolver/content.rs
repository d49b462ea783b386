//! Content resolution.
//!
//! A file's content comes from at most one of `source`, `content`, `epp` or
//! `template`. Supplying more than one is rejected with
//! [`Error::ConflictingContentSource`] instead of letting a downstream engine
//! pick one silently.

use crate::models::{ContentSource, OptionsHash, non_empty};
use crate::render::TemplateRenderer;
use crate::{Error, Result};

/// Where the resolved file's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentDescriptor {
    /// Content is not managed
    Absent,
    /// File served as-is from a source reference
    Source(String),
    /// Literal or rendered content
    Inline(String),
}

impl ContentDescriptor {
    /// Split into the intent's `(source, content)` fields.
    pub fn into_fields(self) -> (Option<String>, Option<String>) {
        match self {
            ContentDescriptor::Absent => (None, None),
            ContentDescriptor::Source(source) => (Some(source), None),
            ContentDescriptor::Inline(content) => (None, Some(content)),
        }
    }
}

/// Compute the file's content.
///
/// Once conflicts are ruled out, fields are checked in the order `content`,
/// `epp`, `template`, `source`. Empty strings count as unset.
pub fn resolve_content(
    sources: &ContentSource,
    options: &OptionsHash,
    renderer: &dyn TemplateRenderer,
) -> Result<ContentDescriptor> {
    let content = non_empty(sources.content.as_deref());
    let epp = non_empty(sources.epp.as_deref());
    let template = non_empty(sources.template.as_deref());
    let source = non_empty(sources.source.as_deref());

    let supplied: Vec<&'static str> = [
        ("source", source.is_some()),
        ("content", content.is_some()),
        ("epp", epp.is_some()),
        ("template", template.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, set)| set.then_some(name))
    .collect();

    if supplied.len() > 1 {
        return Err(Error::ConflictingContentSource(supplied));
    }

    if let Some(content) = content {
        return Ok(ContentDescriptor::Inline(content.to_string()));
    }
    if let Some(epp) = epp {
        return Ok(ContentDescriptor::Inline(
            renderer.render_structured(epp, options)?,
        ));
    }
    if let Some(template) = template {
        return Ok(ContentDescriptor::Inline(
            renderer.render_legacy(template, options)?,
        ));
    }
    if let Some(source) = source {
        return Ok(ContentDescriptor::Source(source.to_string()));
    }

    Ok(ContentDescriptor::Absent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingRenderer, RenderCall};
    use serde_json::json;

    fn sources(
        source: Option<&str>,
        template: Option<&str>,
        epp: Option<&str>,
        content: Option<&str>,
    ) -> ContentSource {
        ContentSource {
            source: source.map(str::to_string),
            template: template.map(str::to_string),
            epp: epp.map(str::to_string),
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn test_nothing_set_is_absent() {
        let renderer = RecordingRenderer::new();
        let result = resolve_content(&ContentSource::default(), &OptionsHash::new(), &renderer);
        assert_eq!(result.unwrap(), ContentDescriptor::Absent);
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn test_literal_content() {
        let renderer = RecordingRenderer::new();
        let result = resolve_content(
            &sources(None, None, None, Some("X")),
            &OptionsHash::new(),
            &renderer,
        );
        assert_eq!(result.unwrap(), ContentDescriptor::Inline("X".to_string()));
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn test_epp_renders_structured_with_options() {
        let renderer = RecordingRenderer::new();
        let mut options = OptionsHash::new();
        options.insert("Port".to_string(), json!(2222));

        let result = resolve_content(
            &sources(None, None, Some("sshd_config.epp"), None),
            &options,
            &renderer,
        );

        assert_eq!(
            result.unwrap(),
            ContentDescriptor::Inline(r#"structured:sshd_config.epp:{"Port":2222}"#.to_string())
        );
        assert_eq!(
            *renderer.calls.borrow(),
            vec![RenderCall::Structured("sshd_config.epp".to_string())]
        );
    }

    #[test]
    fn test_template_renders_legacy_with_options() {
        let renderer = RecordingRenderer::new();
        let result = resolve_content(
            &sources(None, Some("sshd_config.tmpl"), None, None),
            &OptionsHash::new(),
            &renderer,
        );

        assert_eq!(
            result.unwrap(),
            ContentDescriptor::Inline("legacy:sshd_config.tmpl:{}".to_string())
        );
        assert_eq!(
            *renderer.calls.borrow(),
            vec![RenderCall::Legacy("sshd_config.tmpl".to_string())]
        );
    }

    #[test]
    fn test_source_is_passed_through() {
        let renderer = RecordingRenderer::new();
        let result = resolve_content(
            &sources(Some("puppet:///modules/site/sshd_config"), None, None, None),
            &OptionsHash::new(),
            &renderer,
        );
        assert_eq!(
            result.unwrap(),
            ContentDescriptor::Source("puppet:///modules/site/sshd_config".to_string())
        );
    }

    #[test]
    fn test_content_and_template_conflict() {
        let renderer = RecordingRenderer::new();
        let err = resolve_content(
            &sources(None, Some("T"), None, Some("X")),
            &OptionsHash::new(),
            &renderer,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::ConflictingContentSource(ref names) if *names == vec!["content", "template"]
        ));
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn test_source_and_epp_conflict() {
        let renderer = RecordingRenderer::new();
        let err = resolve_content(
            &sources(Some("S"), None, Some("E"), None),
            &OptionsHash::new(),
            &renderer,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::ConflictingContentSource(ref names) if *names == vec!["source", "epp"]
        ));
    }

    #[test]
    fn test_empty_strings_do_not_conflict() {
        let renderer = RecordingRenderer::new();
        let result = resolve_content(
            &sources(Some(""), Some("T"), Some(""), Some("")),
            &OptionsHash::new(),
            &renderer,
        );
        assert_eq!(
            result.unwrap(),
            ContentDescriptor::Inline("legacy:T:{}".to_string())
        );
    }

    #[test]
    fn test_into_fields() {
        assert_eq!(ContentDescriptor::Absent.into_fields(), (None, None));
        assert_eq!(
            ContentDescriptor::Source("s".to_string()).into_fields(),
            (Some("s".to_string()), None)
        );
        assert_eq!(
            ContentDescriptor::Inline("c".to_string()).into_fields(),
            (None, Some("c".to_string()))
        );
    }
}
