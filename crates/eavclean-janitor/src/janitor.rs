//! Core Janitor implementation for EAV store cleanup

use crate::media::{self, MediaFs, MediaOptions};
use crate::report::{ConfigReport, MediaReport, OrphanValueReport, ScopedValueReport, UnusedAttributeReport};
use crate::sweeps::{config_values, orphan_values, scoped_values, unused_attributes};
use crate::{JanitorConfig, JanitorError, ScopedValueTarget, SweepKind, SweepMetrics};
use eavclean_domain::{SystemDefaults, TabularStore};
use std::fmt::Display;
use std::path::Path;
use std::time::Instant;

/// Janitor service for EAV store cleanup
///
/// Responsible for:
/// - Purging values whose attribute definition is gone
/// - Purging unused attribute definitions
/// - Restoring scoped overrides to their global defaults
/// - Restoring configuration rows to their defaults
/// - Removing unreferenced media files
/// - Collecting metrics on cleanup operations
///
/// Filters must be resolved, and the operator must have confirmed, before any
/// sweep is called. The Janitor itself never prompts.
///
/// # Examples
///
/// ```no_run
/// use eavclean_janitor::{Janitor, JanitorConfig};
/// use eavclean_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteStore::new("shop.db")?;
/// let mut janitor = Janitor::new(JanitorConfig::dry_run());
///
/// let report = janitor.purge_orphan_values(&store)?;
/// println!("Would remove {} orphaned values", report.total());
/// println!("{}", janitor.metrics().summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    metrics: SweepMetrics,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self {
            config,
            metrics: SweepMetrics::new(),
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &SweepMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Remove values whose attribute definition no longer exists
    pub fn purge_orphan_values<S>(&mut self, store: &S) -> Result<OrphanValueReport, JanitorError>
    where
        S: TabularStore,
        S::Error: Display,
    {
        let start = Instant::now();
        let report = orphan_values::run(store, &self.config)?;

        tracing::info!(
            orphans = report.total(),
            dry_run = report.dry_run,
            "Orphan-value purge complete"
        );
        self.metrics.record_removal(SweepKind::OrphanValues, report.total());
        self.finish(start);
        Ok(report)
    }

    /// Remove user-defined product attributes that nothing uses
    pub fn purge_unused_attributes<S>(&mut self, store: &S) -> Result<UnusedAttributeReport, JanitorError>
    where
        S: TabularStore,
        S::Error: Display,
    {
        let start = Instant::now();
        let report = unused_attributes::run(store, &self.config)?;

        tracing::info!(
            deleted = report.deleted(),
            skipped = report.skipped.len(),
            dry_run = report.dry_run,
            "Unused-attribute purge complete"
        );
        self.metrics.record_removal(SweepKind::UnusedAttributes, report.deleted());
        self.finish(start);
        Ok(report)
    }

    /// Remove overrides that merely restate their global default
    pub fn restore_scoped_defaults<S>(
        &mut self,
        store: &S,
        target: &ScopedValueTarget,
    ) -> Result<ScopedValueReport, JanitorError>
    where
        S: TabularStore,
        S::Error: Display,
    {
        let start = Instant::now();
        let report = scoped_values::run(store, &self.config, target)?;

        tracing::info!(
            redundant = report.total_redundant(),
            null = report.total_null(),
            anomalies = report.anomalies.len(),
            dry_run = report.dry_run,
            "Scoped-value reconciliation complete"
        );
        self.metrics.record_removal(SweepKind::ScopedValues, report.total());
        self.metrics.record_anomalies(report.anomalies.len() as u64);
        self.finish(start);
        Ok(report)
    }

    /// Remove configuration rows that restate a global or system default
    pub fn restore_config_defaults<S, D>(&mut self, store: &S, defaults: &D) -> Result<ConfigReport, JanitorError>
    where
        S: TabularStore,
        S::Error: Display,
        D: SystemDefaults + ?Sized,
    {
        let start = Instant::now();
        let report = config_values::run(store, &self.config, defaults)?;

        tracing::info!(
            removed = report.removed,
            dry_run = report.dry_run,
            "Config reconciliation complete"
        );
        self.metrics.record_removal(SweepKind::ConfigValues, report.removed);
        self.finish(start);
        Ok(report)
    }

    /// Remove media files under `root` that no gallery row references
    pub fn purge_unused_media<S, F>(
        &mut self,
        store: &S,
        fs: &F,
        root: &Path,
        options: MediaOptions,
    ) -> Result<MediaReport, JanitorError>
    where
        S: TabularStore,
        S::Error: Display,
        F: MediaFs,
    {
        let start = Instant::now();
        let report = media::purge_unused_media(store, fs, root, &self.config, options)?;

        tracing::info!(
            files = report.files,
            bytes = report.bytes,
            failures = report.failures.len(),
            dry_run = report.dry_run,
            "Media purge complete"
        );
        self.metrics.record_removal(SweepKind::Media, report.files);
        self.metrics.record_bytes(report.bytes);
        self.metrics.record_file_failures(report.failures.len() as u64);
        self.finish(start);
        Ok(report)
    }

    fn finish(&mut self, start: Instant) {
        let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.metrics.record_sweep(elapsed);
    }
}
