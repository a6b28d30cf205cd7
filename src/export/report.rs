//! Export report types.
//!
//! Annotations that cannot be expressed in a target format are dropped
//! record by record rather than failing the export. The report keeps track
//! of what was written and what was left out, and why.

use serde::Serialize;
use std::fmt;

use super::ExportFormat;
use crate::data::{Annotation, AnnotationId, ImageId};

/// Summary of a single export call.
#[derive(Clone, Debug, Serialize)]
pub struct ExportReport {
    pub format: ExportFormat,
    /// Images in the input dataset.
    pub images: usize,
    /// Annotations in the input dataset.
    pub annotations: usize,
    /// Distinct labels (categories / classes).
    pub labels: usize,
    /// Records carrying a box: COCO bboxes, YOLO lines or VOC objects.
    pub boxes_written: usize,
    /// Files produced before archiving (1 for COCO).
    pub files_written: usize,
    pub skipped: Vec<SkippedAnnotation>,
}

impl ExportReport {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            images: 0,
            annotations: 0,
            labels: 0,
            boxes_written: 0,
            files_written: 0,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn skip(&mut self, annotation: &Annotation, reason: SkipReason) {
        self.skipped.push(SkippedAnnotation {
            annotation_id: annotation.id,
            image_id: annotation.image_id,
            reason,
        });
    }

    pub fn skipped_count(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Exported {}:", self.format)?;
        writeln!(
            f,
            "  {} images, {} labels, {} annotations",
            self.images, self.labels, self.annotations
        )?;
        writeln!(
            f,
            "  output: {} boxes in {} file(s)",
            self.boxes_written, self.files_written
        )?;

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped ({}):", self.skipped.len())?;
            for skipped in &self.skipped {
                writeln!(
                    f,
                    "  - annotation {} on image {}: {}",
                    skipped.annotation_id, skipped.image_id, skipped.reason
                )?;
            }
        }

        Ok(())
    }
}

/// An annotation left out of the box records of an export.
#[derive(Clone, Debug, Serialize)]
pub struct SkippedAnnotation {
    pub annotation_id: AnnotationId,
    pub image_id: ImageId,
    pub reason: SkipReason,
}

/// Why an annotation contributed no box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// One of x/y/width/height is missing.
    NoCoordinates,
    /// The annotation is not a `bbox` (polygon, point, ...).
    UnsupportedKind,
    /// The image width or height is unknown or zero, so the box cannot be
    /// normalized.
    UnknownImageSize,
}

impl SkipReason {
    /// Classifies an annotation that has no pixel box.
    pub(crate) fn for_missing_box(annotation: &Annotation) -> Self {
        if annotation.kind.is_box() {
            SkipReason::NoCoordinates
        } else {
            SkipReason::UnsupportedKind
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoCoordinates => "missing coordinates",
            SkipReason::UnsupportedKind => "not a bounding box",
            SkipReason::UnknownImageSize => "image size unknown",
        };
        f.write_str(text)
    }
}
