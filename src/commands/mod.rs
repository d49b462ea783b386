//! Command implementations for the tpconf CLI.
//!
//! - `resolve` - Resolve one configuration file
//! - `settings` - Show an application's merged settings
//! - `config_show` - Show the resolved tool configuration

use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::cli::ResolveArgs;
use crate::config::ResolvedConfig;
use crate::debug::write_debug_record;
use crate::models::{BaseDir, Invocation, OptionsHash, ResolvedConf, ResolvedFileIntent};
use crate::render::FileTemplateRenderer;
use crate::resolver::ConfResolver;
use crate::settings::{LayeredSettingsStore, OsFacts, SettingsDict};
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Shared inputs of every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: ResolvedConfig,
    pub facts: OsFacts,
}

impl CommandContext {
    pub fn new(config: ResolvedConfig, facts: OsFacts) -> Self {
        Self { config, facts }
    }

    fn settings_store(&self) -> LayeredSettingsStore {
        LayeredSettingsStore::new(self.config.data_dir.value.clone(), self.facts.clone())
    }
}

// ==================== resolve ====================

/// Result of `tpconf resolve`.
#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    #[serde(flatten)]
    pub resolved: ResolvedConf,
    /// Whether the debug record was written to disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_written: Option<bool>,
}

impl Output for ResolveOutput {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
    }

    fn to_human(&self) -> String {
        let mut lines = format_intent(&self.resolved.file);
        if let Some(ref debug) = self.resolved.debug {
            let written = match self.debug_written {
                Some(true) => "written",
                _ => "not written",
            };
            lines.push(format!("debug: {} ({})", debug.path, written));
        }
        lines.join("\n")
    }
}

fn format_intent(intent: &ResolvedFileIntent) -> Vec<String> {
    let mut lines = vec![
        format!("path: {}", intent.path),
        format!("ensure: {}", intent.ensure),
    ];
    let optional = [
        ("source", intent.source.clone()),
        ("mode", intent.mode.clone()),
        ("owner", intent.owner.clone()),
        ("group", intent.group.clone()),
        ("require", intent.require.as_ref().map(|r| r.to_string())),
        ("notify", intent.notify.as_ref().map(|r| r.to_string())),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{}: {}", name, value));
        }
    }
    if let Some(ref content) = intent.content {
        lines.push("content:".to_string());
        lines.extend(content.lines().map(|line| format!("  {}", line)));
    }
    lines
}

/// Parse a `KEY=VALUE` template option.
///
/// The value is read as JSON when it parses (`2222`, `true`, `["a"]`) and
/// as a plain string otherwise.
pub fn parse_option(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| {
            Error::InvalidInput(format!("Invalid option '{}'. Expected KEY=VALUE.", raw))
        })?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Build an invocation from CLI arguments and the tool configuration.
pub fn build_invocation(args: &ResolveArgs, config: &ResolvedConfig) -> Result<Invocation> {
    let mut options = OptionsHash::new();
    for raw in &args.options {
        let (key, value) = parse_option(raw)?;
        options.insert(key, value);
    }

    let mut invocation = Invocation::new(args.title.clone())
        .with_ensure(args.ensure.parse()?)
        .with_base_dir(BaseDir::parse(&args.base_dir))
        .with_notify(args.notify.parse()?)
        .with_require(args.require.parse()?)
        .with_data_module(
            args.data_module
                .clone()
                .unwrap_or_else(|| config.data_module.value.clone()),
        );

    invocation.content.source = args.source.clone();
    invocation.content.template = args.template.clone();
    invocation.content.epp = args.epp.clone();
    invocation.content.content = args.content.clone();
    invocation.path = args.path.clone();
    invocation.mode = args.mode.clone();
    invocation.owner = args.owner.clone();
    invocation.group = args.group.clone();
    invocation.options = options;
    invocation.debug = args.debug;
    invocation.debug_dir = args
        .debug_dir
        .clone()
        .unwrap_or_else(|| config.debug_dir.value.clone());

    Ok(invocation)
}

/// Resolve one configuration file.
///
/// A debug record, if produced, is also written to disk; failing to write
/// it is logged and reported but never fails the command.
pub fn resolve(ctx: &CommandContext, args: &ResolveArgs) -> Result<ResolveOutput> {
    let invocation = build_invocation(args, &ctx.config)?;
    let store = ctx.settings_store();
    let renderer = FileTemplateRenderer::new(ctx.config.template_dir.value.clone());

    let resolved = ConfResolver::new(&store, &renderer).resolve(&invocation)?;
    let debug_written = resolved.debug.as_ref().map(write_debug_record);

    Ok(ResolveOutput {
        resolved,
        debug_written,
    })
}

// ==================== settings ====================

/// Result of `tpconf settings`.
#[derive(Debug, Serialize)]
pub struct SettingsOutput {
    pub app: String,
    pub data_module: String,
    /// Contributing layer files, lowest precedence first
    pub layers: Vec<PathBuf>,
    pub settings: SettingsDict,
}

impl Output for SettingsOutput {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} ({})", self.app, self.data_module)];
        for layer in &self.layers {
            lines.push(format!("  layer: {}", layer.display()));
        }
        for (key, value) in self.settings.iter() {
            let shown = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            lines.push(format!("  {} = {}", key, shown));
        }
        lines.join("\n")
    }
}

/// Show the merged settings of one application.
pub fn settings(ctx: &CommandContext, app: &str, data_module: Option<&str>) -> Result<SettingsOutput> {
    let data_module = data_module.unwrap_or(&ctx.config.data_module.value);
    let found = ctx
        .settings_store()
        .lookup_with_sources(app, data_module)?
        .ok_or_else(|| Error::SettingsNotFound {
            app: app.to_string(),
            data_module: data_module.to_string(),
        })?;

    Ok(SettingsOutput {
        app: app.to_string(),
        data_module: data_module.to_string(),
        layers: found.sources,
        settings: found.settings,
    })
}

// ==================== config show ====================

/// One resolved configuration value.
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

/// Result of `tpconf config show`.
#[derive(Debug, Serialize)]
pub struct ConfigShowOutput {
    pub config_file: Option<PathBuf>,
    pub entries: Vec<ConfigEntry>,
}

impl Output for ConfigShowOutput {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref path) = self.config_file {
            lines.push(format!("config file: {}", path.display()));
        }
        for entry in &self.entries {
            lines.push(format!("{} = {} ({})", entry.key, entry.value, entry.source));
        }
        lines.join("\n")
    }
}

/// Show the resolved tool configuration.
pub fn config_show(ctx: &CommandContext, config_file: Option<PathBuf>) -> ConfigShowOutput {
    let config = &ctx.config;
    let entries = vec![
        ConfigEntry {
            key: "data-dir",
            value: config.data_dir.value.display().to_string(),
            source: config.data_dir.source.to_string(),
        },
        ConfigEntry {
            key: "data-module",
            value: config.data_module.value.clone(),
            source: config.data_module.source.to_string(),
        },
        ConfigEntry {
            key: "template-dir",
            value: config.template_dir.value.display().to_string(),
            source: config.template_dir.source.to_string(),
        },
        ConfigEntry {
            key: "debug-dir",
            value: config.debug_dir.value.clone(),
            source: config.debug_dir.source.to_string(),
        },
        ConfigEntry {
            key: "output-format",
            value: config.output_format.value.to_string(),
            source: config.output_format.source.to_string(),
        },
    ];

    ConfigShowOutput {
        config_file,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, TpConfConfig, ValueSource, resolve_config_with};
    use crate::models::{DependencyFlag, Ensure};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn context(data_dir: &std::path::Path, template_dir: &std::path::Path) -> CommandContext {
        let overrides = ConfigOverrides::new()
            .with_data_dir(data_dir)
            .with_template_dir(template_dir);
        let config = resolve_config_with(&overrides, |_| None, &TpConfConfig::new(), None);
        CommandContext::new(config, OsFacts::empty())
    }

    fn args(title: &str) -> ResolveArgs {
        ResolveArgs {
            title: title.to_string(),
            ensure: "present".to_string(),
            base_dir: "config".to_string(),
            notify: "true".to_string(),
            require: "true".to_string(),
            ..Default::default()
        }
    }

    // ==================== parse_option Tests ====================

    #[test]
    fn test_parse_option_json_values() {
        assert_eq!(parse_option("Port=2222").unwrap(), ("Port".to_string(), json!(2222)));
        assert_eq!(parse_option("Debug=true").unwrap(), ("Debug".to_string(), json!(true)));
        assert_eq!(
            parse_option(r#"Users=["a","b"]"#).unwrap(),
            ("Users".to_string(), json!(["a", "b"]))
        );
    }

    #[test]
    fn test_parse_option_plain_string() {
        assert_eq!(
            parse_option("ListenAddress=0.0.0.0").unwrap(),
            ("ListenAddress".to_string(), json!("0.0.0.0"))
        );
        assert_eq!(parse_option("Banner=").unwrap(), ("Banner".to_string(), json!("")));
        assert_eq!(
            parse_option("Match=a=b").unwrap(),
            ("Match".to_string(), json!("a=b"))
        );
    }

    #[test]
    fn test_parse_option_invalid() {
        assert!(matches!(parse_option("Port"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_option("=2222"), Err(Error::InvalidInput(_))));
    }

    // ==================== build_invocation Tests ====================

    #[test]
    fn test_build_invocation_defaults_from_config() {
        let config = ResolvedConfig::default();
        let invocation = build_invocation(&args("openssh"), &config).unwrap();

        assert_eq!(invocation.data_module, "tinydata");
        assert_eq!(invocation.debug_dir, "/tmp");
        assert_eq!(invocation.notify, DependencyFlag::AutoDerive);
        assert_eq!(invocation.ensure, Ensure::Present);
    }

    #[test]
    fn test_build_invocation_invalid_ensure() {
        let mut args = args("openssh");
        args.ensure = "running".to_string();

        let err = build_invocation(&args, &ResolvedConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidEnsure(_)));
    }

    // ==================== Command Tests ====================

    #[test]
    fn test_resolve_command_with_template() {
        let data = TempDir::new().unwrap();
        let templates = TempDir::new().unwrap();
        let app_dir = data.path().join("tinydata").join("openssh");
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(
            app_dir.join("default.kdl"),
            r#"
                config_file_path "/etc/ssh/sshd_config"
                config_file_mode "0600"
                package_name "openssh-server"
                service_name "sshd"
            "#,
        )
        .unwrap();
        fs::write(templates.path().join("sshd_config.tmpl"), "Port {{ options.Port }}\n").unwrap();

        let ctx = context(data.path(), templates.path());
        let mut args = args("openssh");
        args.template = Some("sshd_config.tmpl".to_string());
        args.options = vec!["Port=2222".to_string()];

        let output = resolve(&ctx, &args).unwrap();
        let file = &output.resolved.file;

        assert_eq!(file.path, "/etc/ssh/sshd_config");
        assert_eq!(file.content.as_deref(), Some("Port 2222\n"));
        assert_eq!(file.mode.as_deref(), Some("0600"));
        assert_eq!(file.require.as_ref().unwrap().as_str(), "Package[openssh-server]");
        assert_eq!(file.notify.as_ref().unwrap().as_str(), "Service[sshd]");
        assert_eq!(output.debug_written, None);

        let json: Value = serde_json::from_str(&output.to_json()).unwrap();
        assert_eq!(json["file"]["path"], "/etc/ssh/sshd_config");
        assert_eq!(json["debug"], Value::Null);

        let human = output.to_human();
        assert!(human.contains("path: /etc/ssh/sshd_config"));
        assert!(human.contains("  Port 2222"));
    }

    #[test]
    fn test_resolve_command_writes_debug_record() {
        let data = TempDir::new().unwrap();
        let debug_dir = TempDir::new().unwrap();
        let app_dir = data.path().join("tinydata").join("motd");
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(app_dir.join("default.kdl"), "config_file_path \"/etc/motd\"\n").unwrap();

        let ctx = context(data.path(), data.path());
        let mut args = args("motd");
        args.content = Some("Welcome\n".to_string());
        args.debug = true;
        args.debug_dir = Some(debug_dir.path().to_string_lossy().into_owned());

        let output = resolve(&ctx, &args).unwrap();

        assert_eq!(output.debug_written, Some(true));
        let written = fs::read_to_string(debug_dir.path().join("tp_conf_debug_motd")).unwrap();
        assert!(written.contains("\"path\": \"/etc/motd\""));
    }

    #[test]
    fn test_settings_command() {
        let data = TempDir::new().unwrap();
        let app_dir = data.path().join("tinydata").join("nginx");
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(app_dir.join("default.kdl"), "service_name \"nginx\"\n").unwrap();

        let ctx = context(data.path(), data.path());
        let output = settings(&ctx, "nginx", None).unwrap();

        assert_eq!(output.data_module, "tinydata");
        assert_eq!(output.layers, vec![app_dir.join("default.kdl")]);
        assert!(output.to_human().contains("service_name = nginx"));

        let err = settings(&ctx, "nginx", Some("other")).unwrap_err();
        assert!(matches!(err, Error::SettingsNotFound { .. }));
    }

    #[test]
    fn test_config_show() {
        let ctx = context(std::path::Path::new("/srv/data"), std::path::Path::new("/srv/t"));
        let output = config_show(&ctx, None);

        let data_dir = output.entries.iter().find(|e| e.key == "data-dir").unwrap();
        assert_eq!(data_dir.value, "/srv/data");
        assert_eq!(data_dir.source, ValueSource::CliFlag.to_string());

        let module = output.entries.iter().find(|e| e.key == "data-module").unwrap();
        assert_eq!(module.value, "tinydata");
        assert_eq!(module.source, "default");
    }
}
