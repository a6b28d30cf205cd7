//! A [`DatasetSource`] backed by a JSON snapshot of the data store.
//!
//! The snapshot layout is:
//!
//! ```json
//! {
//!   "projects":    [{"id": 1, "name": "demo"}],
//!   "images":      [{"id": 1, "project_id": 1, "filename": "a.jpg", "width": 100, "height": 200}],
//!   "annotations": [{"id": 1, "image_id": 1, "label": "cat", "annotation_type": "bbox",
//!                    "x": 10, "y": 20, "width": 30, "height": 40}]
//! }
//! ```
//!
//! Images keep snapshot order; annotations keep snapshot order per image.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DatasetSource;
use crate::data::{Annotation, Image, ImageId, Project, ProjectId};
use crate::error::ExportError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreSnapshot {
    #[serde(default)]
    projects: Vec<Project>,

    #[serde(default)]
    images: Vec<Image>,

    #[serde(default)]
    annotations: Vec<Annotation>,
}

/// In-memory data store.
#[derive(Clone, Debug, Default)]
pub struct JsonStore {
    projects: BTreeMap<ProjectId, Project>,
    images: Vec<Image>,
    annotations_by_image: BTreeMap<ImageId, Vec<Annotation>>,
}

impl JsonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a store snapshot from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or parsed.
    pub fn read(path: &Path) -> Result<Self, ExportError> {
        let file = File::open(path).map_err(ExportError::Io)?;
        let reader = BufReader::new(file);

        let snapshot: StoreSnapshot =
            serde_json::from_reader(reader).map_err(|source| ExportError::StoreParse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::from_snapshot(snapshot))
    }

    /// Parses a store snapshot from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let snapshot: StoreSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Serializes the store back to snapshot JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let snapshot = StoreSnapshot {
            projects: self.projects.values().cloned().collect(),
            images: self.images.clone(),
            annotations: self
                .annotations_by_image
                .values()
                .flat_map(|anns| anns.iter().cloned())
                .collect(),
        };
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.insert_project(project);
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.insert_image(image);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.insert_annotation(annotation);
        self
    }

    pub fn insert_project(&mut self, project: Project) {
        self.projects.insert(project.id, project);
    }

    pub fn insert_image(&mut self, image: Image) {
        self.images.push(image);
    }

    pub fn insert_annotation(&mut self, annotation: Annotation) {
        self.annotations_by_image
            .entry(annotation.image_id)
            .or_default()
            .push(annotation);
    }

    /// All projects, ordered by ID.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut store = Self::new();
        for project in snapshot.projects {
            store.insert_project(project);
        }
        for image in snapshot.images {
            store.insert_image(image);
        }
        for annotation in snapshot.annotations {
            store.insert_annotation(annotation);
        }
        store
    }
}

impl DatasetSource for JsonStore {
    fn project(&self, project_id: ProjectId) -> Result<Option<Project>, ExportError> {
        Ok(self.projects.get(&project_id).cloned())
    }

    fn images_for_project(&self, project_id: ProjectId) -> Result<Vec<Image>, ExportError> {
        Ok(self
            .images
            .iter()
            .filter(|img| img.project_id == Some(project_id))
            .cloned()
            .collect())
    }

    fn annotations_for_image(&self, image_id: ImageId) -> Result<Vec<Annotation>, ExportError> {
        Ok(self
            .annotations_by_image
            .get(&image_id)
            .cloned()
            .unwrap_or_default())
    }
}
