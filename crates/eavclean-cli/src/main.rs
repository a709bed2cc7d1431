//! eavclean - sweep an EAV catalog database for orphaned and redundant data.

use clap::Parser;
use eavclean_cli::commands;
use eavclean_cli::{Cli, Command, Config, Formatter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> eavclean_cli::Result<()> {
    let config_path = match cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::default_path()?,
    };
    let mut config = Config::load(&config_path)?;

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::OrphanValues(args) => commands::execute_orphan_values(args, &config, &formatter),
        Command::UnusedAttributes(args) => commands::execute_unused_attributes(args, &config, &formatter),
        Command::RestoreDefaults(args) => commands::execute_restore_defaults(args, &config, &formatter),
        Command::RestoreConfigDefaults(args) => {
            commands::execute_restore_config_defaults(args, &config, &formatter)
        }
        Command::UnusedMedia(args) => commands::execute_unused_media(args, &config, &formatter),
        Command::Profile(args) => commands::execute_profile(args, &mut config, &config_path, &formatter),
    }
}
