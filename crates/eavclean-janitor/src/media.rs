//! Media orphan differ
//!
//! Diffs the files under the media root against the paths referenced by the
//! media gallery. Paths are compared in the form the gallery stores them:
//! relative to the media root with a leading `/`.

use crate::config::JanitorConfig;
use crate::error::JanitorError;
use crate::report::{MediaFailure, MediaReport};
use crate::walker::Walker;
use eavclean_domain::{Predicate, Row, Select, TabularStore};
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Gallery table holding referenced paths
pub const GALLERY_TABLE: &str = "catalog_product_entity_media_gallery";

/// Gallery-to-entity relation table
pub const GALLERY_RELATION_TABLE: &str = "catalog_product_entity_media_gallery_value_to_entity";

/// Filesystem operations the differ needs
pub trait MediaFs {
    /// Every entry below `root`, recursively
    fn walk<'a>(&'a self, root: &Path) -> Box<dyn Iterator<Item = io::Result<PathBuf>> + 'a>;

    /// Whether `path` is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// File size in bytes
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Delete a file
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`MediaFs`] over the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalMediaFs;

impl MediaFs for LocalMediaFs {
    fn walk<'a>(&'a self, root: &Path) -> Box<dyn Iterator<Item = io::Result<PathBuf>> + 'a> {
        Box::new(
            WalkDir::new(root)
                .min_depth(1)
                .into_iter()
                .map(|entry| entry.map(walkdir::DirEntry::into_path).map_err(io::Error::from)),
        )
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Which files are candidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaOptions {
    /// Also consider files under the cache subtree
    pub including_cache: bool,
    /// Consider only files under the cache subtree; implies `including_cache`
    pub only_cache: bool,
    /// Reference only gallery paths linked to an entity
    pub including_relation: bool,
}

impl MediaOptions {
    fn includes_cache(&self) -> bool {
        self.including_cache || self.only_cache
    }
}

/// Why a file was kept or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Under the cache subtree and cache files are excluded
    SkippedCache,
    /// Outside the cache subtree in only-cache mode
    SkippedNotCache,
    /// The file is the media root itself
    SkippedEmpty,
    /// The cache copy maps to a referenced original
    ReferencedCacheCopy,
    /// Under the placeholder subtree
    Placeholder,
    /// Referenced directly
    Referenced,
    /// Not referenced anywhere
    Orphaned,
}

/// Pure path classification against a reference set
#[derive(Debug, Clone)]
pub struct MediaClassifier {
    cache_marker: String,
    placeholder_marker: String,
    cache_prefix: Regex,
    options: MediaOptions,
}

impl MediaClassifier {
    /// Build a classifier for the configured cache and placeholder names
    pub fn new(config: &JanitorConfig, options: MediaOptions) -> Result<Self, JanitorError> {
        let pattern = format!(
            r"(?i)/{}_*/[a-z0-9]+(/[a-z0-9]/[a-z0-9]/.+)",
            regex::escape(&config.media_cache_dir)
        );
        let cache_prefix =
            Regex::new(&pattern).map_err(|e| JanitorError::Config(format!("invalid cache directory name: {}", e)))?;

        Ok(Self {
            cache_marker: format!("/{}", config.media_cache_dir),
            placeholder_marker: format!("/{}", config.media_placeholder_dir),
            cache_prefix,
            options,
        })
    }

    /// Whether `relative` lies under the cache subtree
    pub fn is_cache(&self, relative: &str) -> bool {
        relative.contains(&self.cache_marker)
    }

    /// Map a cache copy back to the path of its original
    pub fn strip_cache(&self, relative: &str) -> String {
        self.cache_prefix.replace_all(relative, "$1").into_owned()
    }

    /// Classify a file path relative to the media root
    pub fn classify(&self, relative: &str, references: &HashSet<String>) -> Classification {
        let in_cache = self.is_cache(relative);
        if in_cache && !self.options.includes_cache() {
            return Classification::SkippedCache;
        }
        if !in_cache && self.options.only_cache {
            return Classification::SkippedNotCache;
        }
        if relative.is_empty() || relative == "/" {
            return Classification::SkippedEmpty;
        }
        let original = self.strip_cache(relative);
        if original != relative && references.contains(&original) {
            return Classification::ReferencedCacheCopy;
        }
        if relative.contains(&self.placeholder_marker) {
            return Classification::Placeholder;
        }
        if references.contains(relative) {
            return Classification::Referenced;
        }
        Classification::Orphaned
    }
}

/// Path of `path` relative to `root`, with a leading `/` and `/` separators
///
/// `None` when a component is not valid UTF-8; such a name can never equal a
/// gallery reference.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let components = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(format!("/{}", components.join("/")))
}

/// Read the set of referenced media paths
pub fn load_references<S>(walker: &Walker<'_, S>, including_relation: bool) -> Result<HashSet<String>, JanitorError>
where
    S: TabularStore,
    S::Error: Display,
{
    let store = walker.store();
    let mut query = Select::from(store.table(GALLERY_TABLE)).columns(&["value"]).distinct();
    if including_relation {
        let linked = Select::from(store.table(GALLERY_RELATION_TABLE)).columns(&["value_id"]);
        query = query.filter(Predicate::in_select("value_id", linked));
    }

    let mut references = HashSet::new();
    walker.walk_with(&query, &mut references, |row: &Row, refs: &mut HashSet<String>| {
        if let Some(path) = row.get_text("value") {
            refs.insert(path.to_string());
        }
        Ok(())
    })?;
    Ok(references)
}

/// Remove media files not present in the reference set
pub fn purge_unused_media<S, F>(
    store: &S,
    fs: &F,
    root: &Path,
    config: &JanitorConfig,
    options: MediaOptions,
) -> Result<MediaReport, JanitorError>
where
    S: TabularStore,
    S::Error: Display,
    F: MediaFs,
{
    if !fs.is_dir(root) {
        return Err(JanitorError::Filesystem(format!(
            "media root {} is not a readable directory",
            root.display()
        )));
    }

    let classifier = MediaClassifier::new(config, options)?;
    let walker = Walker::new(store, config.max_walk_depth);
    let references = load_references(&walker, options.including_relation)?;
    tracing::info!(references = references.len(), root = %root.display(), "Scanning media");

    let mut report = MediaReport {
        dry_run: config.dry_run,
        ..MediaReport::default()
    };

    for entry in fs.walk(root) {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot read media entry");
                report.failures.push(MediaFailure {
                    path: String::new(),
                    message: e.to_string(),
                });
                continue;
            }
        };
        if fs.is_dir(&path) {
            continue;
        }

        report.scanned += 1;
        let Some(relative) = relative_path(root, &path) else {
            let shown = path.strip_prefix(root).unwrap_or(path.as_path()).display().to_string();
            tracing::warn!(path = %shown, "Skipping media file with a non UTF-8 name");
            report.failures.push(MediaFailure {
                path: format!("/{}", shown),
                message: "file name is not valid UTF-8".to_string(),
            });
            continue;
        };
        let class = classifier.classify(&relative, &references);
        if class != Classification::Orphaned {
            tracing::debug!(path = %relative, decision = ?class, "Keeping media file");
            continue;
        }

        let size = match fs.size(&path) {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(path = %relative, error = %e, "Cannot stat media file");
                report.failures.push(MediaFailure {
                    path: relative,
                    message: e.to_string(),
                });
                continue;
            }
        };

        if config.dry_run {
            tracing::info!("DRY RUN: Would remove {}", relative);
        } else if let Err(e) = fs.remove(&path) {
            tracing::warn!(path = %relative, error = %e, "Cannot remove media file");
            report.failures.push(MediaFailure {
                path: relative,
                message: e.to_string(),
            });
            continue;
        } else {
            tracing::info!("Removed {}", relative);
        }

        report.files += 1;
        report.bytes += size;
        report.removed.push(relative);
    }

    Ok(report)
}
