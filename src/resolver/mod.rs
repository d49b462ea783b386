//! Resolution of one configuration-file declaration.
//!
//! Stages, in order:
//!
//! 1. [`title`] - split `app::file`
//! 2. [`crate::settings`] - fetch the application's merged settings
//! 3. [`path`], [`content`], [`metadata`], [`dependency`] - independent
//!    resolvers over the same settings
//! 4. [`crate::debug`] - optional diagnostic record
//!
//! Every stage except the debug record is fatal on error. Resolution is a
//! pure function of the invocation and the lookup's answer, so resolving the
//! same invocation twice yields identical intents.

pub mod content;
pub mod dependency;
pub mod metadata;
pub mod path;
pub mod title;

pub use content::{ContentDescriptor, resolve_content};
pub use dependency::{Dependencies, resolve_dependencies};
pub use metadata::{FileMetadata, resolve_metadata};
pub use path::resolve_path;
pub use title::{Title, parse_title};

use crate::Result;
use crate::debug::{EnvScope, ScopeSnapshot, emit_debug_record};
use crate::models::{Invocation, ResolvedConf, ResolvedFileIntent};
use crate::render::TemplateRenderer;
use crate::settings::{SettingsLookup, resolve_settings};

/// Resolves invocations against injected collaborators.
pub struct ConfResolver<'a> {
    settings: &'a dyn SettingsLookup,
    renderer: &'a dyn TemplateRenderer,
    scope: &'a dyn ScopeSnapshot,
}

impl<'a> ConfResolver<'a> {
    /// Create a resolver; debug records snapshot the process environment.
    pub fn new(settings: &'a dyn SettingsLookup, renderer: &'a dyn TemplateRenderer) -> Self {
        Self {
            settings,
            renderer,
            scope: &EnvScope,
        }
    }

    /// Use a different scope snapshot for debug records.
    pub fn with_scope(mut self, scope: &'a dyn ScopeSnapshot) -> Self {
        self.scope = scope;
        self
    }

    /// Resolve one invocation into a file intent (and optional debug record).
    pub fn resolve(&self, invocation: &Invocation) -> Result<ResolvedConf> {
        let title = parse_title(&invocation.title)?;
        let settings = resolve_settings(self.settings, &title.app, &invocation.data_module)?;
        tracing::debug!(
            app = %title.app,
            file = ?title.file,
            data_module = %invocation.data_module,
            keys = settings.len(),
            "resolved settings"
        );

        let path = resolve_path(
            &title.app,
            title.file.as_deref(),
            &invocation.base_dir,
            invocation.path.as_deref(),
            &settings,
        )?;
        let (source, content) =
            resolve_content(&invocation.content, &invocation.options, self.renderer)?
                .into_fields();
        let FileMetadata { mode, owner, group } = resolve_metadata(
            invocation.mode.as_deref(),
            invocation.owner.as_deref(),
            invocation.group.as_deref(),
            &settings,
        );
        let Dependencies { notify, require } =
            resolve_dependencies(&invocation.notify, &invocation.require, &settings);

        let file = ResolvedFileIntent {
            ensure: invocation.ensure,
            path,
            source,
            content,
            mode,
            owner,
            group,
            require,
            notify,
        };
        tracing::debug!(title = %invocation.title, path = %file.path, "resolved file intent");

        let debug = if invocation.debug {
            emit_debug_record(&invocation.title, &invocation.debug_dir, &file, self.scope)
        } else {
            None
        };

        Ok(ResolvedConf { file, debug })
    }
}
