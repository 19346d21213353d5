//! Command-line interface for the LogIQ customer agent.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// LogIQ customer-support agent
#[derive(Parser, Debug)]
#[command(name = "logiq", version, about = "LogIQ customer-support agent")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat; one line per message, empty line or EOF to quit
    Chat(ChatArgs),
    /// Send a single message and print the reply
    Ask(AskArgs),
}

/// Who is chatting and where configuration comes from.
#[derive(Args, Debug, Clone)]
pub struct CustomerArgs {
    /// Customer id, used as the session user id
    #[arg(short, long)]
    pub user_id: String,

    /// Customer display name
    #[arg(short, long)]
    pub name: String,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding a `.env` file
    #[arg(long, default_value = ".")]
    pub env_dir: PathBuf,

    /// Override the model (format: provider:model, e.g. google:gemini-2.0-flash)
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments for the `chat` subcommand.
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub customer: CustomerArgs,
}

/// Arguments for the `ask` subcommand.
#[derive(Args, Debug)]
pub struct AskArgs {
    #[command(flatten)]
    pub customer: CustomerArgs,

    /// Message to send
    pub message: String,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
