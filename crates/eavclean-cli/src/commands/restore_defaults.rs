//! Restore-defaults command implementation.

use super::{gate, log_metrics, open_store};
use crate::cli::RestoreDefaultsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use eavclean_janitor::{
    parse_entity_kind, resolve_attribute_filter, resolve_scope_filter, Janitor, ScopedValueTarget,
};

/// Execute the restore-defaults command.
///
/// Every code is resolved before the confirmation gate, so a bad code
/// fails without prompting and without touching the database.
pub fn execute_restore_defaults(args: RestoreDefaultsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let kind = parse_entity_kind(&args.entity)?;
    let profile = config.get_active_profile()?;
    let store = open_store(profile)?;

    let mut target = ScopedValueTarget::new(kind);
    target.scopes = resolve_scope_filter(&store, args.store_codes.as_deref())?;
    target.attributes = resolve_attribute_filter(
        &store,
        kind,
        args.include_attributes.as_deref(),
        args.exclude_attributes.as_deref(),
    )?;
    target.always_restore = args.always_restore;

    let mode = gate(args.safety)?;

    let mut janitor = Janitor::new(config.janitor_config(profile, mode.is_dry_run()));
    let report = janitor.restore_scoped_defaults(&store, &target)?;
    log_metrics(&janitor);

    println!("{}", formatter.scoped_values(&report)?);
    Ok(())
}
