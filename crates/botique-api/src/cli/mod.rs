//! CLI argument definitions for the `btq` binary.

use clap::{Parser, Subcommand};

pub mod bot;

/// Botique: a bot marketplace with chat.
#[derive(Debug, Parser)]
#[command(name = "btq", version, about = "Botique: create, browse, and chat with bots")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a resource.
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// List resources.
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Show a bot by id.
    Show { id: String },

    /// Delete a resource.
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value_t = 8787)]
        port: u16,
        /// Host to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum CreateResource {
    /// Create a new bot.
    Bot {
        /// Display name.
        name: String,
        /// Persona description.
        #[arg(long)]
        description: Option<String>,
        /// Creator user id (a new one is generated when omitted).
        #[arg(long)]
        creator: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ListResource {
    /// List bots.
    Bots {
        /// Restrict to one creator's bots.
        #[arg(long)]
        creator: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum DeleteResource {
    /// Delete a bot.
    Bot {
        id: String,
        /// Skip the confirmation hint.
        #[arg(long)]
        force: bool,
    },
}
