//! Unused-media command implementation.

use super::{gate, log_metrics, open_store};
use crate::cli::UnusedMediaArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use eavclean_janitor::{Janitor, LocalMediaFs, MediaOptions};
use std::path::PathBuf;

/// Execute the unused-media command.
pub fn execute_unused_media(args: UnusedMediaArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;
    let root = args
        .media_root
        .as_ref()
        .or(profile.media_root.as_ref())
        .map(PathBuf::from)
        .ok_or_else(|| {
            CliError::InvalidInput("no media root; pass --media-root or set media_root in the profile".to_string())
        })?;
    let options = MediaOptions {
        including_cache: args.including_cache,
        only_cache: args.only_cache,
        including_relation: args.including_relation,
    };
    let store = open_store(profile)?;
    let mode = gate(args.safety)?;

    let mut janitor = Janitor::new(config.janitor_config(profile, mode.is_dry_run()));
    let report = janitor.purge_unused_media(&store, &LocalMediaFs, &root, options)?;
    log_metrics(&janitor);

    println!("{}", formatter.media(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SafetyArgs;
    use crate::commands::fixtures::database;
    use crate::config::OutputFormat;
    use std::fs;

    fn args(media_root: Option<String>, safety: SafetyArgs) -> UnusedMediaArgs {
        UnusedMediaArgs {
            including_cache: false,
            only_cache: false,
            including_relation: false,
            media_root,
            safety,
        }
    }

    #[test]
    fn test_removes_unreferenced_file() {
        let (dir, config) = database();
        let root = dir.path().join("media");
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/ab-shirt.jpg"), b"jpeg").unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let force = SafetyArgs { dry_run: false, force: true };
        execute_unused_media(args(Some(root.to_string_lossy().into_owned()), force), &config, &formatter).unwrap();

        assert!(!root.join("a/b/ab-shirt.jpg").exists());
    }

    #[test]
    fn test_media_root_is_required() {
        let (_dir, config) = database();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let err = execute_unused_media(args(None, SafetyArgs::default()), &config, &formatter).unwrap_err();

        assert!(matches!(err, CliError::InvalidInput(_)));
        assert_eq!(err.exit_code(), 2);
    }
}
