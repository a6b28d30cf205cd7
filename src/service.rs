//! Export request handling.
//!
//! [`ExportService`] does what a request handler around the export engine
//! needs: it checks that the project exists, gives each export a private
//! scratch directory, runs the exporter there and hands back an
//! [`ExportArtifact`]. The artifact owns its scratch directory and removes it
//! when dropped. A failed export drops the directory before the error is
//! returned, so no partial output is left behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use tempfile::TempDir;

use crate::data::ProjectId;
use crate::error::ExportError;
use crate::export::{write_dataset, ExportFormat, ExportReport};
use crate::store::{load_project, DatasetSource};

const SCRATCH_PREFIX: &str = "annoexport-";

/// Runs exports against a data source.
pub struct ExportService<S> {
    source: S,
    scratch_root: Option<PathBuf>,
}

impl<S: DatasetSource> ExportService<S> {
    /// Uses the system temporary directory for scratch space.
    pub fn new(source: S) -> Self {
        Self {
            source,
            scratch_root: None,
        }
    }

    /// Places scratch directories under `root` instead.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Exports one project in one format.
    ///
    /// # Errors
    /// [`ExportError::ProjectNotFound`] if the project does not exist, or any
    /// error raised while loading or writing.
    pub fn export(
        &self,
        project_id: ProjectId,
        format: ExportFormat,
    ) -> Result<ExportArtifact, ExportError> {
        let project = self
            .source
            .project(project_id)?
            .ok_or(ExportError::ProjectNotFound(project_id))?;

        let scratch = self.scratch_dir()?;
        let dataset = load_project(&self.source, project_id)?;

        let dest = if format.is_archive() {
            scratch.path().join("export")
        } else {
            scratch.path().join("export.json")
        };
        let (path, report) = write_dataset(format, &dataset, &dest)?;

        info!(
            "project {} ('{}') exported as {}: {} box(es), {} skipped",
            project.id,
            project.name,
            format,
            report.boxes_written,
            report.skipped.len()
        );

        Ok(ExportArtifact {
            path,
            download_name: download_name(&project.name, format),
            format,
            report,
            _scratch: scratch,
        })
    }

    fn scratch_dir(&self) -> Result<TempDir, ExportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let dir = match &self.scratch_root {
            Some(root) => {
                fs::create_dir_all(root).map_err(ExportError::Io)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        };
        dir.map_err(ExportError::Io)
    }
}

/// A finished export living in its own scratch directory.
#[derive(Debug)]
pub struct ExportArtifact {
    path: PathBuf,
    download_name: String,
    format: ExportFormat,
    report: ExportReport,
    _scratch: TempDir,
}

impl ExportArtifact {
    /// Location of the JSON document or zip archive.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Suggested file name for the download, e.g. `pets_yolo.zip`.
    pub fn download_name(&self) -> &str {
        &self.download_name
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    pub fn report(&self) -> &ExportReport {
        &self.report
    }

    /// Copies the artifact out of scratch space.
    ///
    /// If `dest` is an existing directory the artifact is placed inside it
    /// under [`download_name`](Self::download_name). Returns the final path.
    pub fn persist_to(&self, dest: &Path) -> Result<PathBuf, ExportError> {
        let target = if dest.is_dir() {
            dest.join(&self.download_name)
        } else {
            if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(ExportError::Io)?;
            }
            dest.to_path_buf()
        };

        fs::copy(&self.path, &target).map_err(ExportError::Io)?;
        Ok(target)
    }
}

fn download_name(project_name: &str, format: ExportFormat) -> String {
    let safe: String = project_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    format!("{}{}", safe, format.artifact_suffix())
}
