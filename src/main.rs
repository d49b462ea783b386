//! tpconf CLI - Resolve application configuration files into file intents.

use clap::Parser;
use std::process;
use tpconf::cli::{Cli, Commands, ConfigCommands};
use tpconf::commands::{self, CommandContext, Output};
use tpconf::config::{ConfigOverrides, OutputFormat, ResolvedConfig, config_file_path, resolve_config};
use tpconf::settings::OsFacts;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `TPCONF_LOG=debug`).
const LOG_ENV: &str = "TPCONF_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging();

    let mut overrides = ConfigOverrides::new();
    if let Some(ref dir) = cli.data_dir {
        overrides = overrides.with_data_dir(dir);
    }
    if let Some(ref dir) = cli.template_dir {
        overrides = overrides.with_template_dir(dir);
    }
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }

    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(e) => fail(&e, cli.human_readable),
    };
    let human = config.output_format.value == OutputFormat::Human;
    let facts = host_facts(&cli);

    if let Err(e) = run_command(cli.command, config, facts, human) {
        fail(&e, human);
    }
}

/// Install the stderr log subscriber. Defaults to warnings only.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Detected OS facts with any CLI overrides applied.
fn host_facts(cli: &Cli) -> OsFacts {
    let mut facts = OsFacts::detect();
    if let Some(ref family) = cli.os_family {
        facts = facts.with_family(family.clone());
    }
    if let Some(ref name) = cli.os_name {
        facts = facts.with_name(name.clone());
    }
    if let Some(ref release) = cli.os_release {
        facts = facts.with_release_major(release.clone());
    }
    tracing::debug!(?facts, "host facts");
    facts
}

fn run_command(
    command: Commands,
    config: ResolvedConfig,
    facts: OsFacts,
    human: bool,
) -> Result<(), tpconf::Error> {
    let ctx = CommandContext::new(config, facts);

    match command {
        Commands::Resolve(args) => {
            let result = commands::resolve(&ctx, &args)?;
            output(&result, human);
        }
        Commands::Settings { app, data_module } => {
            let result = commands::settings(&ctx, &app, data_module.as_deref())?;
            output(&result, human);
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let result = commands::config_show(&ctx, config_file_path());
                output(&result, human);
            }
        },
    }

    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

fn fail(e: &tpconf::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}
