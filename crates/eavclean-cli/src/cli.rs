//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};

/// eavclean - Sweep an EAV catalog database for orphaned and redundant data.
#[derive(Debug, Parser)]
#[command(name = "eavclean")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(long, global = true, env = "EAVCLEAN_CONFIG")]
    pub config: Option<String>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Log per-row decisions
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remove values whose attribute no longer exists
    OrphanValues(SafetyArgs),

    /// Remove user-defined product attributes that are never used
    UnusedAttributes(SafetyArgs),

    /// Remove store-scope overrides equal to the global default
    RestoreDefaults(RestoreDefaultsArgs),

    /// Remove config entries that repeat the global or system default
    RestoreConfigDefaults(RestoreConfigDefaultsArgs),

    /// Remove media files no gallery row references
    UnusedMedia(UnusedMediaArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// The confirmation pair shared by every destructive command.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct SafetyArgs {
    /// Only report what would be removed
    #[arg(short, long)]
    pub dry_run: bool,

    /// Remove without asking for confirmation
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the restore-defaults command.
#[derive(Debug, Args)]
pub struct RestoreDefaultsArgs {
    /// Entity to sweep (product or category)
    #[arg(short, long)]
    pub entity: String,

    /// Limit the sweep to these store codes
    #[arg(long, value_delimiter = ',')]
    pub store_codes: Option<Vec<String>>,

    /// Only sweep these attribute codes
    #[arg(long, value_delimiter = ',')]
    pub include_attributes: Option<Vec<String>>,

    /// Never sweep these attribute codes
    #[arg(long, value_delimiter = ',')]
    pub exclude_attributes: Option<Vec<String>>,

    /// Remove overrides even when they differ from the default
    #[arg(long)]
    pub always_restore: bool,

    #[command(flatten)]
    pub safety: SafetyArgs,
}

/// Arguments for the restore-config-defaults command.
#[derive(Debug, Args)]
pub struct RestoreConfigDefaultsArgs {
    /// TOML or JSON file with the system defaults (overrides the profile)
    #[arg(long)]
    pub system_defaults: Option<String>,

    #[command(flatten)]
    pub safety: SafetyArgs,
}

/// Arguments for the unused-media command.
#[derive(Debug, Args)]
pub struct UnusedMediaArgs {
    /// Also remove unreferenced cache files
    #[arg(short = 'c', long)]
    pub including_cache: bool,

    /// Only remove unreferenced cache files
    #[arg(short = 'k', long)]
    pub only_cache: bool,

    /// Only count gallery rows linked to an entity as references
    #[arg(short = 'r', long)]
    pub including_relation: bool,

    /// Media root directory (overrides the profile)
    #[arg(long)]
    pub media_root: Option<String>,

    #[command(flatten)]
    pub safety: SafetyArgs,
}

/// Arguments for profile management.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// SQLite database path
        #[arg(long)]
        database: String,
        /// Table name prefix
        #[arg(long)]
        table_prefix: Option<String>,
        /// Database edition
        #[arg(long, value_enum, default_value = "community")]
        edition: EditionArg,
        /// Media root directory
        #[arg(long)]
        media_root: Option<String>,
        /// System defaults file
        #[arg(long)]
        system_defaults: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

/// Edition argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum EditionArg {
    /// Values keyed by entity_id
    Community,
    /// Values keyed by row_id
    Enterprise,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<EditionArg> for crate::config::Edition {
    fn from(edition: EditionArg) -> Self {
        match edition {
            EditionArg::Community => crate::config::Edition::Community,
            EditionArg::Enterprise => crate::config::Edition::Enterprise,
        }
    }
}
