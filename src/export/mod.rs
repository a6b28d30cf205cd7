//! The export engine: COCO, YOLO and Pascal VOC writers.
//!
//! Each format has a pure builder over a [`ProjectDataset`], a writer that
//! puts the artifact on disk and reports what it dropped, and an
//! `export_*` entry point that loads a project from a
//! [`DatasetSource`](crate::store::DatasetSource) first.
//!
//! Exporters keep no state between calls. Every call builds its own
//! [`LabelIndex`] and writes only under the location it is given, so
//! concurrent exports never share anything.

pub mod archive;
pub mod coco;
mod labels;
mod report;
pub mod voc;
pub mod yolo;

pub use coco::export_coco;
pub use labels::LabelIndex;
pub use report::{ExportReport, SkipReason, SkippedAnnotation};
pub use voc::export_pascal_voc;
pub use yolo::export_yolo;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::data::{Image, ProjectDataset};
use crate::error::ExportError;

/// Supported export formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Coco,
    Yolo,
    PascalVoc,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Coco,
        ExportFormat::Yolo,
        ExportFormat::PascalVoc,
    ];

    /// Suffix of the downloadable artifact, e.g. `_coco.json`.
    pub fn artifact_suffix(&self) -> &'static str {
        match self {
            ExportFormat::Coco => "_coco.json",
            ExportFormat::Yolo => "_yolo.zip",
            ExportFormat::PascalVoc => "_voc.zip",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Coco => "application/json",
            ExportFormat::Yolo | ExportFormat::PascalVoc => "application/zip",
        }
    }

    /// Whether the format produces a directory that is then archived.
    pub fn is_archive(&self) -> bool {
        !matches!(self, ExportFormat::Coco)
    }

    fn name(&self) -> &'static str {
        match self {
            ExportFormat::Coco => "coco",
            ExportFormat::Yolo => "yolo",
            ExportFormat::PascalVoc => "pascal-voc",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coco" | "coco-json" => Ok(ExportFormat::Coco),
            "yolo" => Ok(ExportFormat::Yolo),
            "voc" | "pascal-voc" | "pascal_voc" => Ok(ExportFormat::PascalVoc),
            other => Err(ExportError::UnsupportedFormat(format!(
                "'{}' (supported: coco, yolo, pascal-voc)",
                other
            ))),
        }
    }
}

/// Writes `dataset` in `format` at `dest` and returns the artifact path.
///
/// For COCO `dest` is the JSON file. For YOLO and VOC `dest` is the working
/// directory and the artifact is `<dest>.zip`.
pub fn write_dataset(
    format: ExportFormat,
    dataset: &ProjectDataset,
    dest: &Path,
) -> Result<(PathBuf, ExportReport), ExportError> {
    match format {
        ExportFormat::Coco => {
            let report = coco::write_coco_json(dest, dataset)?;
            Ok((dest.to_path_buf(), report))
        }
        ExportFormat::Yolo => {
            let report = yolo::write_yolo_dir(dest, dataset)?;
            Ok((archive::zip_dir(dest)?, report))
        }
        ExportFormat::PascalVoc => {
            let report = voc::write_voc_dir(dest, dataset)?;
            Ok((archive::zip_dir(dest)?, report))
        }
    }
}

/// Base name for an image's generated file: the stem of the last path
/// component of its file name, or `image_<id>` when that is empty.
pub(crate) fn output_stem(image: &Image) -> String {
    Path::new(&image.file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| format!("image_{}", image.id))
}
