//! Restore-config-defaults command implementation.

use super::{gate, log_metrics, open_store};
use crate::cli::RestoreConfigDefaultsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use eavclean_janitor::{ConfigTree, Janitor};

/// Execute the restore-config-defaults command.
pub fn execute_restore_config_defaults(
    args: RestoreConfigDefaultsArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let profile = config.get_active_profile()?;
    let defaults = match args.system_defaults.as_ref().or(profile.system_defaults.as_ref()) {
        Some(path) => ConfigTree::load(path)?,
        None => {
            tracing::warn!("No system defaults file configured; only duplicates will be collapsed");
            ConfigTree::empty()
        }
    };
    let store = open_store(profile)?;
    let mode = gate(args.safety)?;

    let mut janitor = Janitor::new(config.janitor_config(profile, mode.is_dry_run()));
    let report = janitor.restore_config_defaults(&store, &defaults)?;
    log_metrics(&janitor);

    println!("{}", formatter.config_values(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SafetyArgs;
    use crate::commands::fixtures::{database, rows};
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use std::fs;

    const FORCE: SafetyArgs = SafetyArgs { dry_run: false, force: true };

    #[test]
    fn test_defaults_file_from_profile() {
        let (dir, mut config) = database();
        let defaults = dir.path().join("defaults.toml");
        fs::write(&defaults, "[web.seo]\nuse_rewrites = true\n").unwrap();
        let mut profile = config.get_active_profile().unwrap().clone();
        profile.system_defaults = Some(defaults.to_string_lossy().into_owned());
        config.set_profile("default".to_string(), profile);
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let args = RestoreConfigDefaultsArgs {
            system_defaults: None,
            safety: FORCE,
        };
        execute_restore_config_defaults(args, &config, &formatter).unwrap();

        assert_eq!(rows(&config, "core_config_data", ""), 0);
    }

    #[test]
    fn test_without_defaults_only_duplicates_go() {
        let (_dir, config) = database();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let args = RestoreConfigDefaultsArgs {
            system_defaults: None,
            safety: FORCE,
        };
        execute_restore_config_defaults(args, &config, &formatter).unwrap();

        assert_eq!(rows(&config, "core_config_data", ""), 1);
        assert_eq!(rows(&config, "core_config_data", "scope_id = 0"), 1);
    }

    #[test]
    fn test_unreadable_defaults_file() {
        let (dir, config) = database();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let args = RestoreConfigDefaultsArgs {
            system_defaults: Some(dir.path().join("missing.json").to_string_lossy().into_owned()),
            safety: FORCE,
        };
        let err = execute_restore_config_defaults(args, &config, &formatter).unwrap_err();

        assert!(matches!(err, CliError::Janitor(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(rows(&config, "core_config_data", ""), 2);
    }
}
