//! eavclean Janitor
//!
//! Reconciliation engine that sweeps a multi-scope EAV store for data that
//! has become inconsistent or redundant.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Orphan-value purge**: values whose attribute definition (of matching
//!   entity type and backend type) no longer exists
//! - **Unused-attribute purge**: user-defined product attributes with no
//!   values, or with values but no attribute set assignment
//! - **Scoped-value reconciliation**: store-scope overrides identical to the
//!   global default, and NULL overrides
//! - **Config reconciliation**: non-global copies of a global config value,
//!   and global values equal to the compiled-in system default
//! - **Media orphan diff**: files under the media root no gallery row references
//!
//! # Architecture
//!
//! The engine talks to storage only through the traits in `eavclean-domain`
//! ([`TabularStore`](eavclean_domain::TabularStore),
//! [`ScopeDirectory`](eavclean_domain::ScopeDirectory),
//! [`AttributeDirectory`](eavclean_domain::AttributeDirectory),
//! [`SystemDefaults`](eavclean_domain::SystemDefaults)) and to the filesystem
//! through [`MediaFs`]. Large result sets are read through the [`Walker`],
//! which streams one row at a time and supports one level of nested lookup.
//!
//! A sweep runs in three steps, and only the last one mutates:
//!
//! | Step | Who | Side effects |
//! |------|-----|--------------|
//! | Resolve filters | [`resolve_scope_filter`], [`resolve_attribute_filter`] | none; fails closed |
//! | Confirm | [`SafetyGate`] | none |
//! | Sweep | [`Janitor`] | deletes, unless dry-run |
//!
//! # Usage
//!
//! ```no_run
//! use eavclean_janitor::{resolve_scope_filter, Janitor, JanitorConfig, ScopedValueTarget};
//! use eavclean_domain::EntityKind;
//! use eavclean_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("shop.db")?;
//! let scopes = vec!["french".to_string()];
//!
//! let mut target = ScopedValueTarget::new(EntityKind::Product);
//! target.scopes = resolve_scope_filter(&store, Some(scopes.as_slice()))?;
//!
//! let mut janitor = Janitor::new(JanitorConfig::dry_run());
//! let report = janitor.restore_scoped_defaults(&store, &target)?;
//! println!("Would remove {} overrides", report.total());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [janitor]
//! dry_run = false
//! owning_key = "entity_id"        # "row_id" for row-versioned databases
//! media_cache_dir = "cache"
//! media_placeholder_dir = "placeholder"
//! max_walk_depth = 2
//! ```

#![warn(missing_docs)]

mod config;
mod defaults;
mod error;
mod filter;
mod janitor;
mod media;
mod metrics;
mod report;
mod safety;
mod sweeps;
mod walker;

pub use config::{JanitorConfig, OwningKey};
pub use defaults::ConfigTree;
pub use error::{JanitorError, ValidationError};
pub use filter::{
    parse_entity_kind, resolve_attribute_filter, resolve_scope_filter, AttributeFilter, ScopeFilter,
    ADMIN_SCOPE_CODE,
};
pub use janitor::Janitor;
pub use media::{Classification, LocalMediaFs, MediaClassifier, MediaFs, MediaOptions};
pub use metrics::{SweepKind, SweepMetrics};
pub use report::{
    ConfigAction, ConfigActionKind, ConfigReport, IntegrityAnomaly, MediaFailure, MediaReport,
    OrphanValueReport, PartitionCount, RemovalReason, RemovedAttribute, ScopedValueReport,
    UnusedAttributeReport,
};
pub use safety::{GateDecision, Refusal, RunMode, SafetyGate};
pub use sweeps::orphan_values::orphan_predicate;
pub use sweeps::scoped_values::ScopedValueTarget;
pub use walker::{RowHandler, Walker};
