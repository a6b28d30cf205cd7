//! COCO JSON exporter.
//!
//! Produces a single document with `images`, `annotations` and `categories`
//! arrays.
//!
//! # Conventions
//!
//! - `bbox` is `[x, y, width, height]` in absolute pixels, or `[]` when the
//!   annotation has no box.
//! - Annotation IDs are reassigned sequentially from 1 in iteration order
//!   (images in load order, then each image's annotations).
//! - A category's `id` is its label string, and `supercategory` is always
//!   `"object"`. Categories follow [`LabelIndex`] order.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use super::labels::LabelIndex;
use super::report::{ExportReport, SkipReason};
use super::ExportFormat;
use crate::data::{ProjectDataset, ProjectId};
use crate::error::ExportError;
use crate::store::{load_project, DatasetSource};

const SUPERCATEGORY: &str = "object";

/// Top-level COCO document.
#[derive(Debug, Serialize)]
pub struct CocoDocument {
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
    pub categories: Vec<CocoCategory>,
}

#[derive(Debug, Serialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CocoAnnotation {
    pub id: u64,
    pub image_id: u64,
    /// The label string itself.
    pub category_id: String,
    /// `[x, y, width, height]`, or empty when there is no box.
    pub bbox: Vec<f64>,
    pub area: f64,
    pub iscrowd: u8,
}

#[derive(Debug, Serialize)]
pub struct CocoCategory {
    pub id: String,
    pub name: String,
    pub supercategory: &'static str,
}

/// Builds the COCO document for a dataset.
pub fn build_coco(dataset: &ProjectDataset) -> CocoDocument {
    build_coco_with_report(dataset).0
}

fn build_coco_with_report(dataset: &ProjectDataset) -> (CocoDocument, ExportReport) {
    let labels = LabelIndex::collect(dataset);
    let mut report = ExportReport::new(ExportFormat::Coco);
    report.images = dataset.image_count();
    report.annotations = dataset.annotation_count();
    report.labels = labels.len();

    let mut images = Vec::with_capacity(dataset.image_count());
    let mut annotations = Vec::with_capacity(dataset.annotation_count());
    let mut next_id: u64 = 1;

    for entry in &dataset.entries {
        let image = &entry.image;
        images.push(CocoImage {
            id: image.id.as_u64(),
            file_name: image.file_name.clone(),
            width: image.width,
            height: image.height,
        });

        for ann in &entry.annotations {
            let bbox = match ann.pixel_bbox() {
                Some(bbox) => {
                    report.boxes_written += 1;
                    bbox.to_xywh().to_vec()
                }
                None => {
                    report.skip(ann, SkipReason::for_missing_box(ann));
                    Vec::new()
                }
            };

            annotations.push(CocoAnnotation {
                id: next_id,
                image_id: image.id.as_u64(),
                category_id: ann.label.clone(),
                bbox,
                area: ann.box_area(),
                iscrowd: 0,
            });
            next_id += 1;
        }
    }

    let categories = labels
        .labels()
        .iter()
        .map(|label| CocoCategory {
            id: label.clone(),
            name: label.clone(),
            supercategory: SUPERCATEGORY,
        })
        .collect();

    let document = CocoDocument {
        images,
        annotations,
        categories,
    };
    (document, report)
}

/// Renders a dataset as pretty-printed COCO JSON (2-space indent).
pub fn to_coco_string(dataset: &ProjectDataset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&build_coco(dataset))
}

/// Writes a dataset as a COCO JSON file, creating parent directories.
///
/// # Errors
/// Returns an error if a directory or the file cannot be written.
pub fn write_coco_json(path: &Path, dataset: &ProjectDataset) -> Result<ExportReport, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(ExportError::Io)?;
    }

    let (document, mut report) = build_coco_with_report(dataset);

    let file = File::create(path).map_err(ExportError::Io)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document).map_err(|source| {
        ExportError::CocoJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(ExportError::Io)?;

    report.files_written = 1;
    for skipped in &report.skipped {
        warn!(
            "annotation {} on image {} has no bbox in COCO output: {}",
            skipped.annotation_id, skipped.image_id, skipped.reason
        );
    }
    Ok(report)
}

/// Exports a project from `source` as COCO JSON at `output_path`.
///
/// Returns the path of the written document.
pub fn export_coco<S: DatasetSource + ?Sized>(
    source: &S,
    project_id: ProjectId,
    output_path: &Path,
) -> Result<PathBuf, ExportError> {
    let dataset = load_project(source, project_id)?;
    let report = write_coco_json(output_path, &dataset)?;
    info!(
        "exported project {} as COCO: {} image(s), {} annotation(s) -> {}",
        project_id,
        report.images,
        report.annotations,
        output_path.display()
    );
    Ok(output_path.to_path_buf())
}
