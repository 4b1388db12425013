use clap::{Parser, Subcommand};

// Display order for API key option (placed at top of help text)
const API_KEY_DISPLAY_ORDER: usize = 0;
// Display order for log level option (placed at end of help text)
const LOG_LEVEL_DISPLAY_ORDER: usize = 100;

/// CLI arguments
#[derive(Parser)]
#[command(name = "solaudit", version, about = "Audit Solidity contracts with an LLM and apply suggested fixes", long_about = None)]
pub struct Cli {
    /// Log level (see https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
    /// [env: SOLAUDIT_LOG=] [default: info]
    #[arg(
        long,
        env = "SOLAUDIT_LOG",
        default_value = "info",
        global = true,
        hide_default_value = true,
        hide_env = true,
        display_order = LOG_LEVEL_DISPLAY_ORDER,
        verbatim_doc_comment
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a default solaudit.toml config file
    Init(InitArgs),
    /// Audit a contract and apply selected fixes
    Audit(AuditArgs),
    /// List the built-in example contracts
    Examples,
}

/// Arguments for the init command
#[derive(Parser)]
pub struct InitArgs {
    /// Path to config file
    #[arg(long, default_value = "solaudit.toml")]
    pub config: String,

    /// Override existing config file
    #[arg(long)]
    pub r#override: bool,
}

/// Arguments for the audit command
#[derive(Parser, Debug)]
pub struct AuditArgs {
    /// Path to the contract source file, or '-' to read from stdin
    #[arg(value_name = "SOURCE", conflicts_with = "example")]
    pub source: Option<String>,

    /// Audit a built-in example contract instead of a file
    /// (list names with `solaudit examples`)
    #[arg(long, verbatim_doc_comment)]
    pub example: Option<String>,

    /// Path to config file (initialize with `solaudit init`)
    #[arg(long, default_value = "solaudit.toml")]
    pub config: String,

    /// LLM API key
    #[arg(long, env = "SOLAUDIT_LLM_API_KEY", display_order = API_KEY_DISPLAY_ORDER)]
    pub api_key: String,

    /// Finding ids to patch in, comma-separated (e.g. 1,3)
    #[arg(long, conflicts_with = "select_all")]
    pub select: Option<String>,

    /// Patch in every reported finding
    #[arg(long)]
    pub select_all: bool,

    /// Write the findings report to a file (.md or .json)
    #[arg(long)]
    pub report: Option<String>,

    /// Write the patched contract to a file instead of stdout
    #[arg(long)]
    pub output: Option<String>,
}
