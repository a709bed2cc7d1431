//! Unused-attributes command implementation.

use super::{gate, log_metrics, open_store};
use crate::cli::SafetyArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use eavclean_janitor::Janitor;

/// Execute the unused-attributes command.
pub fn execute_unused_attributes(args: SafetyArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;
    let store = open_store(profile)?;
    let mode = gate(args)?;

    let mut janitor = Janitor::new(config.janitor_config(profile, mode.is_dry_run()));
    let report = janitor.purge_unused_attributes(&store)?;
    log_metrics(&janitor);

    println!("{}", formatter.unused_attributes(&report)?);
    Ok(())
}
