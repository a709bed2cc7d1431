//! Per-sweep reports
//!
//! Every sweep returns one of these. Counts mean "removed" in a live run and
//! "would remove" in a dry run; `dry_run` tells which.

use serde::Serialize;
use std::collections::BTreeMap;

/// Row count for one value partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionCount {
    /// Entity type code
    pub entity_type: String,
    /// Backend type of the partition
    pub backend_type: String,
    /// Physical table name
    pub table: String,
    /// Rows classified
    pub count: u64,
}

/// Result of the orphan-value purge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrphanValueReport {
    /// Deletes were suppressed
    pub dry_run: bool,
    /// Orphaned rows per partition, in coverage order
    pub partitions: Vec<PartitionCount>,
    /// Entity types not registered in the store
    pub skipped_entity_types: Vec<String>,
}

impl OrphanValueReport {
    /// Orphaned rows across all partitions
    pub fn total(&self) -> u64 {
        self.partitions.iter().map(|p| p.count).sum()
    }
}

/// Why an attribute definition was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// No value rows reference the attribute
    NoValues,
    /// Values exist but no attribute set includes the attribute
    NotAssigned,
}

impl RemovalReason {
    /// Human readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalReason::NoValues => "no values",
            RemovalReason::NotAssigned => "not assigned",
        }
    }
}

/// One removed attribute definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedAttribute {
    /// Attribute identifier
    pub attribute_id: i64,
    /// Attribute code
    pub code: String,
    /// Backend type
    pub backend_type: String,
    /// Value rows referencing the attribute
    pub value_count: u64,
    /// Assignment rows; only counted when values exist
    pub assignment_count: Option<u64>,
    /// Decision
    pub reason: RemovalReason,
}

/// Result of the unused-attribute purge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnusedAttributeReport {
    /// Deletes were suppressed
    pub dry_run: bool,
    /// Removed definitions, in walk order
    pub removed: Vec<RemovedAttribute>,
    /// Codes of attributes whose backend type has no value partition
    pub skipped: Vec<String>,
}

impl UnusedAttributeReport {
    /// Number of deleted attribute definitions
    pub fn deleted(&self) -> u64 {
        self.removed.len() as u64
    }
}

/// More than one global-scope row for an override's key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityAnomaly {
    /// Physical table name
    pub table: String,
    /// Attribute of the override
    pub attribute_id: i64,
    /// Owning-key column
    pub key_column: String,
    /// Owning-key value, rendered as text
    pub key: String,
    /// Override row left unclassified
    pub override_value_id: i64,
    /// Number of global rows found
    pub default_rows: usize,
}

/// Result of the scoped-value reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopedValueReport {
    /// Deletes were suppressed
    pub dry_run: bool,
    /// Entity type code the sweep ran against
    pub entity_type: String,
    /// Overrides were removed regardless of value equality
    pub always_restore: bool,
    /// Redundant overrides per attribute
    pub removed_per_attribute: BTreeMap<i64, u64>,
    /// NULL overrides per partition
    pub null_overrides: Vec<PartitionCount>,
    /// Keys with more than one global row
    pub anomalies: Vec<IntegrityAnomaly>,
}

impl ScopedValueReport {
    /// Count one redundant override of `attribute_id`
    pub fn record_removed(&mut self, attribute_id: i64) {
        *self.removed_per_attribute.entry(attribute_id).or_insert(0) += 1;
    }

    /// Redundant overrides across all attributes
    pub fn total_redundant(&self) -> u64 {
        self.removed_per_attribute.values().sum()
    }

    /// NULL overrides across all partitions
    pub fn total_null(&self) -> u64 {
        self.null_overrides.iter().map(|p| p.count).sum()
    }

    /// Every override removed
    pub fn total(&self) -> u64 {
        self.total_redundant() + self.total_null()
    }
}

/// What happened to one global `(path, value)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ConfigActionKind {
    /// Non-global copies of the pair were removed
    DuplicatesCollapsed {
        /// Copies removed
        count: u64,
    },
    /// The global row equals the system default and was removed
    MatchesSystemDefault {
        /// Global rows removed
        count: u64,
    },
}

/// One config reconciliation action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigAction {
    /// Configuration path
    pub path: String,
    /// Global value; `None` for NULL
    pub value: Option<String>,
    /// Action taken
    #[serde(flatten)]
    pub kind: ConfigActionKind,
}

impl ConfigAction {
    /// Rows this action removed
    pub fn count(&self) -> u64 {
        match self.kind {
            ConfigActionKind::DuplicatesCollapsed { count } => count,
            ConfigActionKind::MatchesSystemDefault { count } => count,
        }
    }
}

/// Result of the config-entry reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    /// Deletes were suppressed
    pub dry_run: bool,
    /// Actions in walk order
    pub actions: Vec<ConfigAction>,
    /// Rows removed
    pub removed: u64,
}

impl ConfigReport {
    /// Record an action and add its rows to the total
    pub fn record(&mut self, action: ConfigAction) {
        self.removed += action.count();
        self.actions.push(action);
    }
}

/// A media file that could not be sized or removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFailure {
    /// Path relative to the media root
    pub path: String,
    /// Error message
    pub message: String,
}

/// Result of the media orphan diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaReport {
    /// Deletes were suppressed
    pub dry_run: bool,
    /// Regular files inspected
    pub scanned: u64,
    /// Orphaned files removed
    pub files: u64,
    /// Bytes removed
    pub bytes: u64,
    /// Relative paths of removed files
    pub removed: Vec<String>,
    /// Per-file failures
    pub failures: Vec<MediaFailure>,
}

impl MediaReport {
    /// Removed size in megabytes
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / 1024.0 / 1024.0
    }
}
