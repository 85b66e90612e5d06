//! `databricks fs ...`

use std::io::Write;

use clap::{Args, Subcommand};
use databricks_api::FileInfo;

use crate::cli::Result;
use crate::dbfs::{CpOutcome, CpRequest, cp};
use crate::paths::DbfsPath;
use crate::remote::DbfsApi;

#[derive(Subcommand, Debug)]
pub enum FsCommand {
    /// List files in a DBFS directory.
    Ls(LsArgs),

    /// Create a DBFS directory and any missing parents.
    Mkdirs(PathArg),

    /// Remove a file or directory from DBFS.
    Rm(RmArgs),

    /// Move a file or directory within DBFS.
    Mv(MvArgs),

    /// Copy files between the local filesystem and DBFS.
    Cp(CpArgs),
}

#[derive(Args, Debug)]
pub struct LsArgs {
    /// DBFS directory to list.
    #[arg(default_value = "dbfs:/")]
    pub path: String,

    /// Show the entry type and size next to each name.
    #[arg(short, long)]
    pub long: bool,

    /// Print absolute paths instead of base names.
    #[arg(long)]
    pub absolute: bool,
}

#[derive(Args, Debug)]
pub struct PathArg {
    pub path: String,
}

#[derive(Args, Debug)]
pub struct RmArgs {
    pub path: String,

    /// Remove directories and their contents.
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(Args, Debug)]
pub struct MvArgs {
    pub source: String,
    pub destination: String,
}

#[derive(Args, Debug)]
pub struct CpArgs {
    pub source: String,
    pub destination: String,

    /// Copy directories and their contents.
    #[arg(short, long)]
    pub recursive: bool,

    /// Replace files that already exist at the destination.
    #[arg(long)]
    pub overwrite: bool,
}

impl FsCommand {
    pub async fn run(self, api: &dyn DbfsApi, out: &mut dyn Write) -> Result<()> {
        match self {
            FsCommand::Ls(args) => {
                let path = DbfsPath::parse(&args.path)?;
                let files = api.list_files(path.absolute_path()).await?;
                for file in &files {
                    writeln!(out, "{}", format_entry(file, args.long, args.absolute))?;
                }
            }
            FsCommand::Mkdirs(args) => {
                let path = DbfsPath::parse(&args.path)?;
                api.mkdirs(path.absolute_path()).await?;
            }
            FsCommand::Rm(args) => {
                let path = DbfsPath::parse(&args.path)?;
                api.delete(path.absolute_path(), args.recursive).await?;
                tracing::info!(path = %path, "deleted");
            }
            FsCommand::Mv(args) => {
                let source = DbfsPath::parse(&args.source)?;
                let destination = DbfsPath::parse(&args.destination)?;
                api.move_path(source.absolute_path(), destination.absolute_path()).await?;
                tracing::info!(from = %source, to = %destination, "moved");
            }
            FsCommand::Cp(args) => {
                let request = CpRequest {
                    source: args.source,
                    destination: args.destination,
                    recursive: args.recursive,
                    overwrite: args.overwrite,
                };
                match cp(api, &request).await? {
                    CpOutcome::Uploaded { files } => tracing::debug!(files, "upload finished"),
                    CpOutcome::Downloaded { files } => {
                        tracing::debug!(files, "download finished")
                    }
                }
            }
        }
        Ok(())
    }
}

fn format_entry(file: &FileInfo, long: bool, absolute: bool) -> String {
    let name = if absolute {
        file.path.as_str()
    } else {
        file.basename()
    };
    if !long {
        return name.to_string();
    }
    let kind = if file.is_dir { "dir" } else { "file" };
    format!("{kind:<4}  {:>12}  {name}", file.file_size)
}
