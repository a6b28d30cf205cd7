//! Annoexport: dataset export for image annotation projects.
//!
//! Takes the images and annotations of one project and writes them out as a
//! COCO JSON document, a zipped YOLO label tree, or a zipped set of Pascal
//! VOC XML files.
//!
//! # Modules
//!
//! - [`data`]: Records (projects, images, annotations) and box types
//! - [`store`]: The data-access trait and a JSON snapshot store
//! - [`export`]: The three format exporters and shared label indexing
//! - [`service`]: Scratch-space handling around a single export request
//! - [`error`]: Error types

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod service;
pub mod store;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use config::{Settings, DATA_ENV, SCRATCH_DIR_ENV};
use data::ProjectId;
pub use error::ExportError;
use export::ExportFormat;
use service::ExportService;
use store::{load_project, JsonStore};

/// The annoexport CLI application.
#[derive(Parser)]
#[command(name = "annoexport")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Export one project as COCO, YOLO or Pascal VOC.
    Export(ExportArgs),
    /// List projects in a data store with image and annotation counts.
    Projects(ProjectsArgs),
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Data store snapshot (JSON).
    #[arg(long, env = DATA_ENV)]
    data: PathBuf,

    /// Project ID to export.
    #[arg(long)]
    project: u64,

    /// Output format ('coco', 'yolo', or 'pascal-voc').
    #[arg(long, default_value = "coco")]
    format: String,

    /// Destination file, or an existing directory to save into under the
    /// default download name.
    #[arg(short, long)]
    output: PathBuf,

    /// Directory for temporary export output.
    #[arg(long, env = SCRATCH_DIR_ENV)]
    scratch_dir: Option<PathBuf>,

    /// Report format ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Arguments for the projects subcommand.
#[derive(clap::Args)]
struct ProjectsArgs {
    /// Data store snapshot (JSON).
    #[arg(long, env = DATA_ENV)]
    data: PathBuf,
}

/// Run the annoexport CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ExportError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Export(args)) => {
            let settings = Settings {
                data: args.data.clone(),
                scratch_dir: args.scratch_dir.clone(),
                verbosity: cli.verbose,
            };
            config::init_logging(settings.log_level());
            run_export(&settings, args)
        }
        Some(Commands::Projects(args)) => {
            let settings = Settings {
                data: args.data,
                scratch_dir: None,
                verbosity: cli.verbose,
            };
            config::init_logging(settings.log_level());
            run_projects(&settings)
        }
        None => {
            println!("annoexport {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Dataset export for image annotation projects.");
            println!();
            println!("Run 'annoexport --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the export subcommand.
fn run_export(settings: &Settings, args: ExportArgs) -> Result<(), ExportError> {
    let format: ExportFormat = args.format.parse()?;
    let json_report = match args.report.as_str() {
        "text" => false,
        "json" => true,
        other => {
            return Err(ExportError::UnsupportedFormat(format!(
                "report '{}' (supported: text, json)",
                other
            )));
        }
    };

    let store = JsonStore::read(&settings.data)?;
    let mut service = ExportService::new(store);
    if let Some(root) = &settings.scratch_dir {
        service = service.with_scratch_root(root);
    }

    let artifact = service.export(ProjectId::new(args.project), format)?;
    let saved = artifact.persist_to(&args.output)?;

    if json_report {
        let json =
            serde_json::to_string_pretty(artifact.report()).map_err(ExportError::ReportRender)?;
        println!("{}", json);
    } else {
        print!("{}", artifact.report());
        println!("Wrote {}", saved.display());
    }

    Ok(())
}

/// Execute the projects subcommand.
fn run_projects(settings: &Settings) -> Result<(), ExportError> {
    let store = JsonStore::read(&settings.data)?;

    for project in store.projects() {
        let dataset = load_project(&store, project.id)?;
        println!(
            "{}\t{}\t{} images, {} annotations",
            project.id,
            project.name,
            dataset.image_count(),
            dataset.annotation_count()
        );
    }

    Ok(())
}
