//! Pascal VOC XML exporter.
//!
//! Writes `Annotations/<stem>.xml` for every image that has at least one
//! annotation, then packs the directory into `<dir>.zip`. Each document
//! names the folder `images`, records the image size with a fixed depth of
//! 3, and holds one `<object>` per box with corner coordinates truncated to
//! integers. Unknown image dimensions are written as `0`.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::archive::zip_dir;
use super::labels::LabelIndex;
use super::report::{ExportReport, SkipReason};
use super::{output_stem, ExportFormat};
use crate::data::{ImageEntry, ProjectDataset, ProjectId};
use crate::error::ExportError;
use crate::store::{load_project, DatasetSource};

const ANNOTATIONS_DIR: &str = "Annotations";
const VOC_XML_EXTENSION: &str = "xml";
const FOLDER_NAME: &str = "images";
const IMAGE_DEPTH: u32 = 3;

/// Writes the VOC directory tree (without archiving it).
///
/// # Errors
/// Returns an error if a directory or file cannot be written.
pub fn write_voc_dir(dir: &Path, dataset: &ProjectDataset) -> Result<ExportReport, ExportError> {
    let annotations_dir = dir.join(ANNOTATIONS_DIR);
    fs::create_dir_all(&annotations_dir).map_err(ExportError::Io)?;

    let mut report = ExportReport::new(ExportFormat::PascalVoc);
    report.images = dataset.image_count();
    report.annotations = dataset.annotation_count();
    report.labels = LabelIndex::collect(dataset).len();

    let mut used_stems = BTreeSet::new();

    for entry in &dataset.entries {
        if entry.annotations.is_empty() {
            continue;
        }

        let stem = output_stem(&entry.image);
        if !used_stems.insert(stem.clone()) {
            warn!(
                "image {} ('{}') reuses annotation file name '{}.{}'; earlier content is overwritten",
                entry.image.id, entry.image.file_name, stem, VOC_XML_EXTENSION
            );
        }

        let xml = render_voc_xml(entry, &mut report);
        let xml_path = annotations_dir.join(format!("{stem}.{VOC_XML_EXTENSION}"));
        fs::write(&xml_path, xml).map_err(ExportError::Io)?;
        report.files_written += 1;
        debug!("wrote {}", xml_path.display());
    }

    for skipped in &report.skipped {
        warn!(
            "annotation {} on image {} left out of VOC objects: {}",
            skipped.annotation_id, skipped.image_id, skipped.reason
        );
    }

    Ok(report)
}

/// Renders the VOC document for one image.
pub fn to_voc_xml(entry: &ImageEntry) -> String {
    let mut scratch = ExportReport::new(ExportFormat::PascalVoc);
    render_voc_xml(entry, &mut scratch)
}

fn render_voc_xml(entry: &ImageEntry, report: &mut ExportReport) -> String {
    let image = &entry.image;
    let mut xml = String::new();

    writeln!(xml, "<?xml version=\"1.0\" encoding=\"utf-8\"?>").expect("write to string");
    writeln!(xml, "<annotation>").expect("write to string");
    writeln!(xml, "  <folder>{FOLDER_NAME}</folder>").expect("write to string");
    writeln!(
        xml,
        "  <filename>{}</filename>",
        xml_escape(&image.file_name)
    )
    .expect("write to string");
    writeln!(xml, "  <size>").expect("write to string");
    writeln!(xml, "    <width>{}</width>", image.width.unwrap_or(0)).expect("write to string");
    writeln!(xml, "    <height>{}</height>", image.height.unwrap_or(0))
        .expect("write to string");
    writeln!(xml, "    <depth>{IMAGE_DEPTH}</depth>").expect("write to string");
    writeln!(xml, "  </size>").expect("write to string");

    for ann in &entry.annotations {
        let Some(bbox) = ann.pixel_bbox() else {
            report.skip(ann, SkipReason::for_missing_box(ann));
            continue;
        };

        writeln!(xml, "  <object>").expect("write to string");
        writeln!(xml, "    <name>{}</name>", xml_escape(&ann.label)).expect("write to string");
        writeln!(xml, "    <bndbox>").expect("write to string");
        writeln!(xml, "      <xmin>{}</xmin>", truncate_px(bbox.x())).expect("write to string");
        writeln!(xml, "      <ymin>{}</ymin>", truncate_px(bbox.y())).expect("write to string");
        writeln!(xml, "      <xmax>{}</xmax>", truncate_px(bbox.xmax()))
            .expect("write to string");
        writeln!(xml, "      <ymax>{}</ymax>", truncate_px(bbox.ymax()))
            .expect("write to string");
        writeln!(xml, "    </bndbox>").expect("write to string");
        writeln!(xml, "  </object>").expect("write to string");
        report.boxes_written += 1;
    }

    writeln!(xml, "</annotation>").expect("write to string");
    xml
}

/// Truncates toward zero. Non-finite values saturate (NaN becomes 0).
fn truncate_px(value: f64) -> i64 {
    value.trunc() as i64
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Exports a project from `source` as a zipped Pascal VOC dataset.
///
/// The tree is written under `output_dir`; the returned path is the archive
/// `<output_dir>.zip`.
pub fn export_pascal_voc<S: DatasetSource + ?Sized>(
    source: &S,
    project_id: ProjectId,
    output_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let dataset = load_project(source, project_id)?;
    let report = write_voc_dir(output_dir, &dataset)?;
    let archive = zip_dir(output_dir)?;
    info!(
        "exported project {} as Pascal VOC: {} document(s), {} object(s) -> {}",
        project_id,
        report.files_written,
        report.boxes_written,
        archive.display()
    );
    Ok(archive)
}
