//! `databricks workspace ...`

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use databricks_api::{ObjectInfo, ObjectType, WorkspaceFormat, WorkspaceLanguage};

use crate::cli::Result;
use crate::remote::WorkspaceApi;
use crate::workspace::{SyncReport, export_dir, export_notebook, import_dir, import_notebook};

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    /// List objects in a workspace directory.
    Ls(LsArgs),

    /// Create a workspace directory and any missing parents.
    Mkdirs(PathArg),

    /// Remove a workspace object.
    Rm(RmArgs),

    /// Export a single notebook to a local file.
    Export(ExportArgs),

    /// Import a local file as a notebook.
    Import(ImportArgs),

    /// Recursively export a workspace directory as source files.
    #[command(name = "export_dir", alias = "export-dir")]
    ExportDir(DirArgs),

    /// Recursively import a local directory of source files.
    #[command(name = "import_dir", alias = "import-dir")]
    ImportDir(DirArgs),
}

#[derive(Args, Debug)]
pub struct LsArgs {
    /// Workspace directory to list.
    #[arg(default_value = "/")]
    pub path: String,

    /// Show the object type and language next to each name.
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
pub struct ExportArgs {
    /// Workspace path of the notebook.
    pub source: String,

    /// Local file, or an existing directory to export into.
    pub target: PathBuf,

    /// SOURCE, HTML, JUPYTER or DBC.
    #[arg(short, long, default_value_t = WorkspaceFormat::Source)]
    pub format: WorkspaceFormat,

    /// Replace an existing local file.
    #[arg(short, long)]
    pub overwrite: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Local file to import.
    pub source: PathBuf,

    /// Workspace path of the new notebook.
    pub target: String,

    /// SCALA, PYTHON, SQL or R. Inferred from the file extension when omitted.
    #[arg(short, long)]
    pub language: Option<WorkspaceLanguage>,

    /// SOURCE, HTML, JUPYTER or DBC.
    #[arg(short, long, default_value_t = WorkspaceFormat::Source)]
    pub format: WorkspaceFormat,

    /// Replace an existing notebook.
    #[arg(short, long)]
    pub overwrite: bool,
}

#[derive(Args, Debug)]
pub struct DirArgs {
    pub source: String,
    pub target: String,

    /// Replace files or notebooks that already exist.
    #[arg(short, long)]
    pub overwrite: bool,
}

impl WorkspaceCommand {
    pub async fn run(self, api: &dyn WorkspaceApi, out: &mut dyn Write) -> Result<()> {
        match self {
            WorkspaceCommand::Ls(args) => {
                let objects = api.list_objects(&args.path).await?;
                for object in &objects {
                    writeln!(out, "{}", format_object(object, args.long, args.absolute))?;
                }
            }
            WorkspaceCommand::Mkdirs(args) => api.mkdirs(&args.path).await?,
            WorkspaceCommand::Rm(args) => {
                api.delete(&args.path, args.recursive).await?;
                tracing::info!(path = %args.path, "deleted");
            }
            WorkspaceCommand::Export(args) => {
                let target = export_notebook(
                    api,
                    &args.source,
                    &args.target,
                    args.format,
                    args.overwrite,
                )
                .await?;
                tracing::info!(from = %args.source, to = %target.display(), "exported");
            }
            WorkspaceCommand::Import(args) => {
                let language = import_notebook(
                    api,
                    &args.source,
                    &args.target,
                    args.language,
                    args.format,
                    args.overwrite,
                )
                .await?;
                tracing::info!(
                    from = %args.source.display(),
                    to = %args.target,
                    %language,
                    "imported"
                );
            }
            WorkspaceCommand::ExportDir(args) => {
                let report =
                    export_dir(api, &args.source, args.target.as_ref(), args.overwrite).await?;
                write_report(out, "Exported", &report)?;
            }
            WorkspaceCommand::ImportDir(args) => {
                let report =
                    import_dir(api, args.source.as_ref(), &args.target, args.overwrite).await?;
                write_report(out, "Imported", &report)?;
            }
        }
        Ok(())
    }
}

fn format_object(object: &ObjectInfo, long: bool, absolute: bool) -> String {
    let name = if absolute {
        object.path.as_str()
    } else {
        object.basename()
    };
    if !long {
        return name.to_string();
    }
    let kind = match object.object_type {
        ObjectType::Directory => "DIRECTORY",
        ObjectType::Notebook => "NOTEBOOK",
        ObjectType::Library => "LIBRARY",
        ObjectType::Other => "OTHER",
    };
    let language = object.language.map(WorkspaceLanguage::as_str).unwrap_or("");
    format!("{kind:<9}  {language:<6}  {name}")
}

fn write_report(out: &mut dyn Write, verb: &str, report: &SyncReport) -> std::io::Result<()> {
    writeln!(
        out,
        "{verb} {} notebooks from {} directories",
        report.notebooks, report.directories
    )?;
    for skipped in &report.skipped {
        writeln!(out, "Skipped {skipped}")?;
    }
    Ok(())
}
