//! Command implementations.

pub mod orphan_values;
pub mod profile;
pub mod restore_config_defaults;
pub mod restore_defaults;
pub mod unused_attributes;
pub mod unused_media;

pub use self::orphan_values::execute_orphan_values;
pub use self::profile::execute_profile;
pub use self::restore_config_defaults::execute_restore_config_defaults;
pub use self::restore_defaults::execute_restore_defaults;
pub use self::unused_attributes::execute_unused_attributes;
pub use self::unused_media::execute_unused_media;

use crate::cli::SafetyArgs;
use crate::config::Profile;
use crate::error::{CliError, Result};
use eavclean_janitor::{GateDecision, Janitor, RunMode, SafetyGate};
use eavclean_store::SqliteStore;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

/// Prompt shown before a live sweep.
pub const CONFIRMATION_PROMPT: &str = "Are you sure you want to continue? [No] ";

/// Open the profile's database.
pub fn open_store(profile: &Profile) -> Result<SqliteStore> {
    if profile.database != ":memory:" && !Path::new(&profile.database).exists() {
        return Err(CliError::Config(format!(
            "Database '{}' does not exist",
            profile.database
        )));
    }
    Ok(SqliteStore::with_prefix(&profile.database, &profile.table_prefix)?)
}

/// Decide the run mode, asking on the terminal when neither flag is given.
pub fn gate(safety: SafetyArgs) -> Result<RunMode> {
    let interactive = io::stdin().is_terminal();
    decide(safety, interactive, || {
        let stdin = io::stdin();
        confirm(&mut stdin.lock(), &mut io::stdout())
    })
}

/// Run the safety gate with an explicit prompt.
pub fn decide<F>(safety: SafetyArgs, interactive: bool, ask: F) -> Result<RunMode>
where
    F: FnOnce() -> bool,
{
    match SafetyGate::new(safety.dry_run, safety.force).evaluate(interactive, ask) {
        GateDecision::Proceed(mode) => Ok(mode),
        GateDecision::Refused(refusal) => Err(CliError::Aborted(refusal.message().to_string())),
    }
}

/// Ask the confirmation question; anything but a yes declines.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> bool {
    if write!(output, "{}", CONFIRMATION_PROMPT).and_then(|_| output.flush()).is_err() {
        return false;
    }

    let mut response = String::new();
    match input.read_line(&mut response) {
        Ok(_) => response.trim().to_lowercase().starts_with('y'),
        Err(_) => false,
    }
}

/// Log the accumulated sweep counters.
pub(crate) fn log_metrics(janitor: &Janitor) {
    tracing::debug!("{}", janitor.metrics().summary());
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::{Config, Edition, Profile};
    use eavclean_store::SqliteStore;
    use tempfile::TempDir;

    /// A file-backed database with one product attribute and a few values
    pub fn database() -> (TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.db");
        let store = SqliteStore::new(&path).unwrap();
        store
            .connection()
            .execute_batch(
                "INSERT INTO eav_entity_type (entity_type_id, entity_type_code) VALUES
                     (3, 'catalog_category'), (4, 'catalog_product');
                 INSERT INTO store (store_id, code) VALUES (0, 'admin'), (1, 'default'), (2, 'french');
                 INSERT INTO eav_attribute (attribute_id, entity_type_id, attribute_code, backend_type, is_user_defined) VALUES
                     (73, 4, 'name', 'varchar', 0),
                     (94, 4, 'legacy_label', 'varchar', 1);
                 INSERT INTO eav_entity_attribute (entity_type_id, attribute_set_id, attribute_group_id, attribute_id) VALUES
                     (4, 4, 7, 73);
                 INSERT INTO catalog_product_entity_varchar (value_id, attribute_id, store_id, entity_id, value) VALUES
                     (1, 73, 0, 10, 'Shirt'),
                     (2, 73, 2, 10, 'Shirt'),
                     (3, 999, 0, 10, 'orphan');
                 INSERT INTO core_config_data (scope, scope_id, path, value) VALUES
                     ('default', 0, 'web/seo/use_rewrites', '1'),
                     ('stores', 2, 'web/seo/use_rewrites', '1');",
            )
            .unwrap();

        let mut config = Config::default();
        config.set_profile(
            "default".to_string(),
            Profile {
                database: path.to_string_lossy().into_owned(),
                table_prefix: String::new(),
                edition: Edition::Community,
                media_root: None,
                system_defaults: None,
            },
        );
        (dir, config)
    }

    /// Rows in `table` matching `filter`
    pub fn rows(config: &Config, table: &str, filter: &str) -> i64 {
        let store = super::open_store(config.get_active_profile().unwrap()).unwrap();
        let sql = if filter.is_empty() {
            format!("SELECT COUNT(*) FROM {}", table)
        } else {
            format!("SELECT COUNT(*) FROM {} WHERE {}", table, filter)
        };
        store.connection().query_row(&sql, [], |row| row.get(0)).unwrap()
    }
}
