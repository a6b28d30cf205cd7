//! YOLO exporter.
//!
//! Output layout under the destination directory:
//!
//! ```text
//! classes.txt        one label per line; line number = class index
//! labels/<stem>.txt  one line per box: `class cx cy w h`, normalized to [0, 1]
//! ```
//!
//! Images without annotations get no label file. An image whose annotations
//! all lack a usable box still gets one, left empty. The directory is then
//! packed into `<dir>.zip`.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::archive::zip_dir;
use super::labels::LabelIndex;
use super::report::{ExportReport, SkipReason};
use super::{output_stem, ExportFormat};
use crate::data::{CenterBox, ImageEntry, Normalized, ProjectDataset, ProjectId};
use crate::error::ExportError;
use crate::store::{load_project, DatasetSource};

const LABELS_DIR: &str = "labels";
const CLASSES_FILE: &str = "classes.txt";
const LABEL_EXTENSION: &str = "txt";

/// Writes the YOLO directory tree (without archiving it).
///
/// # Errors
/// Returns an error if a directory or file cannot be written.
pub fn write_yolo_dir(dir: &Path, dataset: &ProjectDataset) -> Result<ExportReport, ExportError> {
    let labels_dir = dir.join(LABELS_DIR);
    fs::create_dir_all(&labels_dir).map_err(ExportError::Io)?;

    let labels = LabelIndex::collect(dataset);
    let mut report = ExportReport::new(ExportFormat::Yolo);
    report.images = dataset.image_count();
    report.annotations = dataset.annotation_count();
    report.labels = labels.len();

    let mut used_stems = BTreeSet::new();

    for entry in &dataset.entries {
        if entry.annotations.is_empty() {
            continue;
        }

        let stem = output_stem(&entry.image);
        if !used_stems.insert(stem.clone()) {
            warn!(
                "image {} ('{}') reuses label file name '{}.{}'; earlier content is overwritten",
                entry.image.id, entry.image.file_name, stem, LABEL_EXTENSION
            );
        }

        let content = label_file_content(entry, &labels, &mut report);
        let label_path = labels_dir.join(format!("{stem}.{LABEL_EXTENSION}"));
        fs::write(&label_path, content).map_err(ExportError::Io)?;
        report.files_written += 1;
        debug!("wrote {}", label_path.display());
    }

    let mut classes = String::new();
    for label in labels.labels() {
        classes.push_str(label);
        classes.push('\n');
    }
    fs::write(dir.join(CLASSES_FILE), classes).map_err(ExportError::Io)?;
    report.files_written += 1;

    for skipped in &report.skipped {
        warn!(
            "annotation {} on image {} left out of YOLO labels: {}",
            skipped.annotation_id, skipped.image_id, skipped.reason
        );
    }

    Ok(report)
}

/// Renders the label file body for one image.
fn label_file_content(entry: &ImageEntry, labels: &LabelIndex, report: &mut ExportReport) -> String {
    let image = &entry.image;
    let mut content = String::new();

    for ann in &entry.annotations {
        let Some(bbox) = ann.pixel_bbox() else {
            report.skip(ann, SkipReason::for_missing_box(ann));
            continue;
        };
        let Some(norm) = bbox.to_center().normalize(image.width, image.height) else {
            report.skip(ann, SkipReason::UnknownImageSize);
            continue;
        };
        // Every label was collected up front, so this lookup always hits.
        let Some(class_id) = labels.index_of(&ann.label) else {
            continue;
        };

        content.push_str(&yolo_line(class_id, &norm));
        report.boxes_written += 1;
    }

    content
}

/// Formats one label line, newline included.
///
/// Values use the shortest representation that round-trips, e.g.
/// `0 0.25 0.2 0.3 0.2`.
pub fn yolo_line(class_id: usize, bbox: &CenterBox<Normalized>) -> String {
    let (cx, cy, w, h) = bbox.to_tuple();
    format!("{class_id} {cx} {cy} {w} {h}\n")
}

/// Exports a project from `source` as a zipped YOLO dataset.
///
/// The tree is written under `output_dir`; the returned path is the archive
/// `<output_dir>.zip`.
pub fn export_yolo<S: DatasetSource + ?Sized>(
    source: &S,
    project_id: ProjectId,
    output_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let dataset = load_project(source, project_id)?;
    let report = write_yolo_dir(output_dir, &dataset)?;
    let archive = zip_dir(output_dir)?;
    info!(
        "exported project {} as YOLO: {} label file(s), {} class(es) -> {}",
        project_id,
        report.files_written.saturating_sub(1),
        report.labels,
        archive.display()
    );
    Ok(archive)
}
