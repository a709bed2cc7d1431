//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use eavclean_janitor::{JanitorConfig, OwningKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Engine settings shared by every profile
    #[serde(default)]
    pub janitor: JanitorConfig,
}

/// One database installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// SQLite database path
    pub database: String,

    /// Prefix carried by every table name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub table_prefix: String,

    /// Database edition
    #[serde(default)]
    pub edition: Edition,

    /// Media root directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_root: Option<String>,

    /// System defaults file (TOML or JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_defaults: Option<String>,
}

/// Database edition; decides how values are keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    /// Values keyed by entity_id
    #[default]
    Community,
    /// Row-versioned values keyed by row_id
    Enterprise,
}

impl Edition {
    /// Owning-key column of the value partitions
    pub fn owning_key(&self) -> OwningKey {
        match self {
            Edition::Community => OwningKey::EntityId,
            Edition::Enterprise => OwningKey::RowId,
        }
    }
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (counts only) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".eavclean").join("config.toml"))
    }

    /// Load configuration from `path`, or defaults when the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }

    /// Engine configuration for the active profile.
    pub fn janitor_config(&self, profile: &Profile, dry_run: bool) -> JanitorConfig {
        JanitorConfig {
            dry_run,
            owning_key: profile.edition.owning_key(),
            ..self.janitor.clone()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "default".to_string(),
            Profile {
                database: "eavclean.db".to_string(),
                table_prefix: String::new(),
                edition: Edition::Community,
                media_root: None,
                system_defaults: None,
            },
        );

        Self {
            active_profile: "default".to_string(),
            profiles,
            settings: Settings::default(),
            janitor: JanitorConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
