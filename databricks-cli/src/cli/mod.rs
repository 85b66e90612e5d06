//! Command-line interface for the `databricks` binary.

mod fs;
mod workspace;

use std::io;

use clap::{Parser, Subcommand};
use databricks_api::{ApiClient, ApiError, DbfsClient, WorkspaceClient};
use thiserror::Error;

use crate::config::{ClientConfig, ConfigError};
use crate::dbfs::CpError;
use crate::paths::PathError;
use crate::workspace::SyncError;

pub use fs::FsCommand;
pub use workspace::WorkspaceCommand;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Cp(#[from] CpError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Copy files to DBFS and sync workspace notebooks with a local directory.
#[derive(Parser, Debug)]
#[command(name = "databricks", version, about, long_about = None)]
pub struct Cli {
    /// Section of ~/.databrickscfg to read host and token from.
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Log every remote call.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// DBFS file operations.
    Fs {
        #[command(subcommand)]
        command: FsCommand,
    },

    /// Workspace notebook operations.
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommand,
    },
}

impl Cli {
    /// Resolves credentials and runs the selected command, writing listings to stdout.
    pub async fn run(self) -> Result<()> {
        let config = ClientConfig::resolve(self.profile.as_deref())?;
        let api = ApiClient::new(&config.host, config.token)?;
        let mut out = io::stdout();
        match self.command {
            Command::Fs { command } => command.run(&DbfsClient::new(api), &mut out).await,
            Command::Workspace { command } => {
                command
                    .run(&WorkspaceClient::new(api), &mut out)
                    .await
            }
        }
    }
}
