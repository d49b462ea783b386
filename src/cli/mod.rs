//! CLI argument definitions for tpconf.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// tpconf - Resolve application configuration files into file intents.
///
/// Start with `tpconf settings <app>` to see what an application's data
/// provides, then `tpconf resolve <app>[::file]` to compute a file intent.
#[derive(Parser, Debug)]
#[command(name = "tpconf")]
#[command(author, about = "Resolve application configuration files into file intents", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TPCONF_GIT_COMMIT"), ")"))]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Root directory of the settings layer files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory templates are read from
    #[arg(long, global = true)]
    pub template_dir: Option<PathBuf>,

    /// OS family used to pick settings layers (detected if omitted)
    #[arg(long, global = true)]
    pub os_family: Option<String>,

    /// OS name used to pick settings layers (detected if omitted)
    #[arg(long, global = true)]
    pub os_name: Option<String>,

    /// OS major release used to pick settings layers (detected if omitted)
    #[arg(long, global = true)]
    pub os_release: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one configuration file into a file intent
    Resolve(ResolveArgs),

    /// Show the merged settings of an application
    Settings {
        /// Application name (e.g. openssh)
        app: String,

        /// Data module holding the application's settings
        #[arg(long)]
        data_module: Option<String>,
    },

    /// Tool configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Arguments of `tpconf resolve`.
#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// `app` or `app::file` (file may be a relative path)
    pub title: String,

    /// Desired state: present or absent
    #[arg(long, default_value = "present")]
    pub ensure: String,

    /// Serve the file as-is from this source reference
    #[arg(long)]
    pub source: Option<String>,

    /// Render this legacy template (options bound as `options`)
    #[arg(long)]
    pub template: Option<String>,

    /// Render this structured template (options bound as parameters)
    #[arg(long)]
    pub epp: Option<String>,

    /// Literal file content
    #[arg(long)]
    pub content: Option<String>,

    /// Directory category for `app::file`: config, conf, data, log, ssl
    #[arg(long, default_value = "config")]
    pub base_dir: String,

    /// Explicit path (overrides everything else)
    #[arg(long)]
    pub path: Option<String>,

    /// File mode (e.g. 0644)
    #[arg(long)]
    pub mode: Option<String>,

    /// File owner
    #[arg(long)]
    pub owner: Option<String>,

    /// File group
    #[arg(long)]
    pub group: Option<String>,

    /// Notify target: true (derive from service_name), false, or a reference
    #[arg(long, default_value = "true")]
    pub notify: String,

    /// Require target: true (derive from package_name), false, or a reference
    #[arg(long, default_value = "true")]
    pub require: String,

    /// Template option KEY=VALUE (VALUE parsed as JSON, else taken as a string)
    #[arg(long = "option", short = 'o', value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Also produce (and write) a debug record
    #[arg(long)]
    pub debug: bool,

    /// Directory for the debug record
    #[arg(long)]
    pub debug_dir: Option<String>,

    /// Data module holding the application's settings
    #[arg(long)]
    pub data_module: Option<String>,
}

/// Tool configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration and where each value came from
    Show,
}
