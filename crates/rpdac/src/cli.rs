//! Clap derive structures for the `rpdac` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rpdac -- ReportPortal dashboards as code
#[derive(Debug, Parser)]
#[command(
    name = "rpdac",
    version,
    about = "Manage ReportPortal dashboards and filters from YAML definitions",
    long_about = "Keeps ReportPortal dashboards, widgets and filters in line with\n\
        YAML files kept under version control.\n\n\
        `apply` creates what is missing, updates what differs and leaves\n\
        everything else untouched.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (default: ./.rpdac.toml, then the user config dir)
    #[arg(long, env = "RPDAC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Config profile to use
    #[arg(long, env = "RPDAC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// ReportPortal endpoint (example: https://reportportal.example.com)
    #[arg(long, short = 'e', env = "RPDAC_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// ReportPortal access token
    #[arg(long, short = 't', env = "RPDAC_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// ReportPortal project
    #[arg(long, short = 'p', env = "RPDAC_PROJECT", global = true)]
    pub project: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "RPDAC_OUTPUT", default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "RPDAC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: from config, else 30)
    #[arg(long, env = "RPDAC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Object kinds addressable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[value(alias = "dashboards")]
    Dashboard,
    #[value(alias = "filters")]
    Filter,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update objects from a YAML file or directory
    Apply(ApplyArgs),

    /// Create an object from a YAML file without looking for an existing one
    Create(CreateArgs),

    /// Write an existing object to a YAML file
    Export(ExportArgs),

    /// Show an object by name
    Get(GetArgs),

    /// Delete an object by name
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Object commands ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// YAML file, or directory of YAML files
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    /// Walk a directory and apply every .yml/.yaml file below it
    #[arg(long, short = 'r')]
    pub recursive: bool,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// YAML file
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Object kind
    pub kind: KindArg,

    /// Remote id of the object
    #[arg(long, short = 'i')]
    pub id: i64,

    /// Destination YAML file
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Object kind
    pub kind: KindArg,

    /// Object name
    pub name: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Object kind
    pub kind: KindArg,

    /// Object name
    pub name: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with guided setup
    Init,

    /// Display the loaded configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an access token in the system keyring
    SetToken {
        /// Profile to store the token for (default: active profile)
        #[arg(long = "for")]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
