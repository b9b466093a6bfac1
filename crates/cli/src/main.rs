//! Pod Director CLI
//!
//! A command-line tool for managing pod records and their cluster
//! deployments through the pod-director control API.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{deploy, pods};

/// Pod Director CLI
#[derive(Parser)]
#[command(name = "pdctl")]
#[command(author, version, about = "CLI for Pod Director", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via PD_API_URL env var)
    #[arg(long, env = "PD_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage pod records
    #[command(subcommand)]
    Pods(PodsCommands),

    /// Manage cluster deployments
    #[command(subcommand)]
    Deploy(DeployCommands),
}

#[derive(Subcommand)]
pub enum PodsCommands {
    /// List all pod records
    List,

    /// Show a single pod record
    Get {
        /// Record identifier
        id: i64,
    },

    /// Register a pod record from a spec file
    Register {
        /// Path to a JSON pod spec
        #[arg(long, short)]
        file: String,
    },

    /// Update a pod record from a spec file
    Update {
        /// Record identifier
        id: i64,

        /// Path to a JSON pod spec
        #[arg(long, short)]
        file: String,
    },

    /// Remove a pod record
    Remove {
        /// Record identifier
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum DeployCommands {
    /// Create the deployment for a pod spec in the cluster
    Create {
        /// Path to a JSON pod spec
        #[arg(long, short)]
        file: String,
    },

    /// Replace the cluster deployment for a pod spec
    Update {
        /// Path to a JSON pod spec
        #[arg(long, short)]
        file: String,
    },

    /// Delete the deployment tracked by a pod record
    Delete {
        /// Record identifier
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Pods(pods_cmd) => match pods_cmd {
            PodsCommands::List => pods::list_pods(&client, cli.format).await?,
            PodsCommands::Get { id } => pods::get_pod(&client, id, cli.format).await?,
            PodsCommands::Register { file } => pods::register_pod(&client, &file).await?,
            PodsCommands::Update { id, file } => pods::update_pod(&client, id, &file).await?,
            PodsCommands::Remove { id } => pods::remove_pod(&client, id).await?,
        },
        Commands::Deploy(deploy_cmd) => match deploy_cmd {
            DeployCommands::Create { file } => deploy::create_deployment(&client, &file).await?,
            DeployCommands::Update { file } => deploy::update_deployment(&client, &file).await?,
            DeployCommands::Delete { id } => deploy::delete_deployment(&client, id).await?,
        },
    }

    Ok(())
}
