use crate::config::Overrides;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ssnctl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declaratively manage Spot stateful nodes on Azure", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create, update or delete a stateful node to match a manifest
    Apply(ApplyArgs),

    /// Show what apply would send, without changing anything
    Plan(ManifestArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

// ============================================================================
// Apply / Plan
// ============================================================================

#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub target: ManifestArgs,

    /// Skip the confirmation prompt before deleting
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ManifestArgs {
    /// Manifest file (TOML, or JSON with a .json extension)
    pub manifest: PathBuf,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Flags that override manifest values
#[derive(Args)]
pub struct OverrideArgs {
    /// Desired state: present or absent
    #[arg(long)]
    pub state: Option<String>,

    /// Id of an existing stateful node
    #[arg(long)]
    pub id: Option<String>,

    /// How an existing node is identified: id or name
    #[arg(long)]
    pub uniqueness_by: Option<String>,

    /// Dotted path to leave untouched on update (repeatable)
    #[arg(long = "do-not-update", value_name = "PATH")]
    pub do_not_update: Vec<String>,

    /// State transition after a successful update: pause, resume or recycle
    #[arg(long)]
    pub action: Option<String>,

    /// API token
    #[arg(long, env = "SPOTINST_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Account id
    #[arg(long, env = "SPOTINST_ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// Credentials file
    #[arg(long)]
    pub credentials_path: Option<String>,
}

impl From<OverrideArgs> for Overrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            state: args.state,
            id: args.id,
            uniqueness_by: args.uniqueness_by,
            do_not_update: args.do_not_update,
            action: args.action,
            token: args.token,
            account_id: args.account_id,
            credentials_path: args.credentials_path,
        }
    }
}
