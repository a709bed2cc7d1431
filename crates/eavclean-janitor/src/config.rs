//! Configuration for Janitor operations
//!
//! Controls dry-run behaviour, the owning-key column of the value partitions
//! and the media path conventions.

use serde::{Deserialize, Serialize};

/// Column that identifies the owning record in a value partition
///
/// Community databases key values by `entity_id`; row-versioned databases
/// key them by `row_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwningKey {
    /// Plain entity identifier
    EntityId,
    /// Row-versioned identifier
    RowId,
}

impl OwningKey {
    /// Column name in the value partitions
    pub fn column(&self) -> &'static str {
        match self {
            OwningKey::EntityId => "entity_id",
            OwningKey::RowId => "row_id",
        }
    }
}

/// Configuration for the Janitor
///
/// # Examples
///
/// ```
/// use eavclean_janitor::{JanitorConfig, OwningKey};
///
/// // Default configuration
/// let config = JanitorConfig::default();
/// assert!(!config.dry_run);
/// assert_eq!(config.owning_key, OwningKey::EntityId);
///
/// // Report only
/// let config = JanitorConfig::dry_run();
/// assert!(config.dry_run);
///
/// // Row-versioned databases
/// let config = JanitorConfig::row_versioned();
/// assert_eq!(config.owning_key.column(), "row_id");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Dry-run mode: classify and count without deleting anything
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Owning-key column used to pair an override with its default
    /// Default: entity_id
    #[serde(default = "default_owning_key")]
    pub owning_key: OwningKey,

    /// Name of the media cache directory
    /// Default: "cache"
    #[serde(default = "default_media_cache_dir")]
    pub media_cache_dir: String,

    /// Name of the media placeholder directory
    /// Default: "placeholder"
    #[serde(default = "default_media_placeholder_dir")]
    pub media_placeholder_dir: String,

    /// Maximum nesting of streamed walks
    /// Default: 2 (an outer walk plus one lookup per row)
    #[serde(default = "default_max_walk_depth")]
    pub max_walk_depth: usize,
}

fn default_owning_key() -> OwningKey {
    OwningKey::EntityId
}

fn default_media_cache_dir() -> String {
    "cache".to_string()
}

fn default_media_placeholder_dir() -> String {
    "placeholder".to_string()
}

fn default_max_walk_depth() -> usize {
    2
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            owning_key: default_owning_key(),
            media_cache_dir: default_media_cache_dir(),
            media_placeholder_dir: default_media_placeholder_dir(),
            max_walk_depth: default_max_walk_depth(),
        }
    }
}

impl JanitorConfig {
    /// Default configuration with deletes suppressed
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Default configuration for row-versioned databases
    pub fn row_versioned() -> Self {
        Self {
            owning_key: OwningKey::RowId,
            ..Self::default()
        }
    }
}
