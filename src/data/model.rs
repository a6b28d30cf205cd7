//! Stored records and the materialized per-project dataset.
//!
//! `Project`, `Image` and `Annotation` mirror what the persistence layer
//! hands back. Exporters never mutate them; they only read a
//! [`ProjectDataset`] snapshot assembled by the store.

use serde::{Deserialize, Serialize};

use super::bbox::BBox;
use super::ids::{AnnotationId, ImageId, ProjectId};
use super::space::Pixel;

/// A named collection of images.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// An uploaded image.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,

    /// Project the image belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,

    /// Stored file name; its stem names the generated label/XML files.
    #[serde(alias = "filename")]
    pub file_name: String,

    /// Width in pixels, when known.
    #[serde(default)]
    pub width: Option<u32>,

    /// Height in pixels, when known.
    #[serde(default)]
    pub height: Option<u32>,
}

impl Image {
    /// Creates an image with unknown dimensions and no project.
    pub fn new(id: impl Into<ImageId>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: None,
            file_name: file_name.into(),
            width: None,
            height: None,
        }
    }

    /// Sets the pixel dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Assigns the image to a project.
    pub fn in_project(mut self, project_id: impl Into<ProjectId>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

/// The shape an annotation was drawn as.
///
/// Unrecognised values deserialize to [`AnnotationKind::Other`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    #[default]
    Bbox,
    Polygon,
    Point,
    #[serde(other)]
    Other,
}

impl AnnotationKind {
    /// Whether annotations of this kind take part in box-based exports.
    #[inline]
    pub fn is_box(&self) -> bool {
        matches!(self, AnnotationKind::Bbox)
    }
}

/// A vertex of a polygon or point annotation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A labeled shape attached to an image.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,

    pub image_id: ImageId,

    /// Free-form class label.
    pub label: String,

    #[serde(default, alias = "annotation_type")]
    pub kind: AnnotationKind,

    /// Top-left corner and extent in absolute pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Polygon/point vertices. Not used by the box exporters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<Point>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(
        default,
        alias = "annotation_metadata",
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<serde_json::Value>,
}

impl Annotation {
    /// Creates a `bbox` annotation with no coordinates yet.
    pub fn new(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            image_id: image_id.into(),
            label: label.into(),
            kind: AnnotationKind::Bbox,
            x: None,
            y: None,
            width: None,
            height: None,
            coordinates: None,
            confidence: None,
            metadata: None,
        }
    }

    /// Sets the top-left corner and extent.
    pub fn with_xywh(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_kind(mut self, kind: AnnotationKind) -> Self {
        self.kind = kind;
        self
    }

    /// The pixel-space box, if this is a `bbox` annotation with all four
    /// coordinates populated.
    pub fn pixel_bbox(&self) -> Option<BBox<Pixel>> {
        if !self.kind.is_box() {
            return None;
        }
        Some(BBox::from_xywh(self.x?, self.y?, self.width?, self.height?))
    }

    /// `width * height` when both dimensions are present, otherwise `0`.
    ///
    /// Unlike [`pixel_bbox`](Self::pixel_bbox) this ignores the kind and the
    /// origin.
    pub fn box_area(&self) -> f64 {
        match (self.width, self.height) {
            (Some(w), Some(h)) => w * h,
            _ => 0.0,
        }
    }
}

/// One image together with its annotations, in store order.
#[derive(Clone, Debug)]
pub struct ImageEntry {
    pub image: Image,
    pub annotations: Vec<Annotation>,
}

impl ImageEntry {
    pub fn new(image: Image, annotations: Vec<Annotation>) -> Self {
        Self { image, annotations }
    }
}

/// Every image of one project with its annotations, in load order.
///
/// This is the only input the exporters consume. The order of `entries`
/// (and of each entry's annotations) fixes the order of everything written.
#[derive(Clone, Debug, Default)]
pub struct ProjectDataset {
    pub entries: Vec<ImageEntry>,
}

impl ProjectDataset {
    pub fn new(entries: Vec<ImageEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn image_count(&self) -> usize {
        self.entries.len()
    }

    pub fn annotation_count(&self) -> usize {
        self.entries.iter().map(|e| e.annotations.len()).sum()
    }

    /// All annotations, image by image.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.iter().flat_map(|e| e.annotations.iter())
    }
}
