//! Metrics collection for Janitor operations

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Kind of sweep a count belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepKind {
    /// Orphan-value purge
    OrphanValues,
    /// Unused-attribute purge
    UnusedAttributes,
    /// Scoped-value reconciliation
    ScopedValues,
    /// Config-entry reconciliation
    ConfigValues,
    /// Media orphan diff
    Media,
}

impl fmt::Display for SweepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SweepKind::OrphanValues => "orphan values",
            SweepKind::UnusedAttributes => "unused attributes",
            SweepKind::ScopedValues => "scoped values",
            SweepKind::ConfigValues => "config values",
            SweepKind::Media => "media files",
        };
        f.write_str(label)
    }
}

/// Metrics collected across the sweeps run by one Janitor
///
/// Counts are "removed" for live runs and "would remove" for dry runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepMetrics {
    /// Rows or files removed per sweep kind
    pub removed: BTreeMap<SweepKind, u64>,

    /// Media bytes removed
    pub bytes_removed: u64,

    /// Integrity anomalies encountered
    pub anomalies: u64,

    /// Per-file media failures
    pub file_failures: u64,

    /// Sweeps completed
    pub sweep_count: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl SweepMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record removals for a sweep kind
    pub fn record_removal(&mut self, kind: SweepKind, count: u64) {
        *self.removed.entry(kind).or_insert(0) += count;
    }

    /// Record removed media bytes
    pub fn record_bytes(&mut self, bytes: u64) {
        self.bytes_removed += bytes;
    }

    /// Record integrity anomalies
    pub fn record_anomalies(&mut self, count: u64) {
        self.anomalies += count;
    }

    /// Record per-file media failures
    pub fn record_file_failures(&mut self, count: u64) {
        self.file_failures += count;
    }

    /// Record a completed sweep
    pub fn record_sweep(&mut self, runtime_ms: u64) {
        self.sweep_count += 1;
        self.total_runtime_ms += runtime_ms;
    }

    /// Total removals across all sweep kinds
    pub fn total_removed(&self) -> u64 {
        self.removed.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        self.removed.clear();
        self.bytes_removed = 0;
        self.anomalies = 0;
        self.file_failures = 0;
        self.sweep_count = 0;
        self.total_runtime_ms = 0;
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Sweep Metrics Summary".to_string(),
            "=====================".to_string(),
            format!("Sweeps: {}", self.sweep_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
        ];

        if !self.removed.is_empty() {
            lines.push("Removed by sweep:".to_string());
            for (kind, count) in &self.removed {
                lines.push(format!("  {}: {}", kind, count));
            }
            lines.push(format!("  Total: {}", self.total_removed()));
        }

        if self.bytes_removed > 0 {
            lines.push(format!("Media bytes: {}", self.bytes_removed));
        }
        if self.anomalies > 0 {
            lines.push(format!("Integrity anomalies: {}", self.anomalies));
        }
        if self.file_failures > 0 {
            lines.push(format!("File failures: {}", self.file_failures));
        }

        lines.join("\n")
    }
}
