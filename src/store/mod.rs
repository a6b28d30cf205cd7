//! Access to stored projects, images and annotations.
//!
//! The export engine does not own a persistence layer. It talks to one
//! through [`DatasetSource`] and materializes a [`ProjectDataset`] snapshot
//! once per export call with [`load_project`].

mod json_store;

pub use json_store::JsonStore;

use log::debug;

use crate::data::{Annotation, Image, ImageEntry, ImageId, Project, ProjectDataset, ProjectId};
use crate::error::ExportError;

/// The data-access operations the exporters rely on.
pub trait DatasetSource {
    /// Looks up a project. `Ok(None)` means it does not exist.
    fn project(&self, project_id: ProjectId) -> Result<Option<Project>, ExportError>;

    /// Images belonging to a project, in the order they should be exported.
    fn images_for_project(&self, project_id: ProjectId) -> Result<Vec<Image>, ExportError>;

    /// Annotations attached to an image.
    fn annotations_for_image(&self, image_id: ImageId) -> Result<Vec<Annotation>, ExportError>;
}

impl<S: DatasetSource + ?Sized> DatasetSource for &S {
    fn project(&self, project_id: ProjectId) -> Result<Option<Project>, ExportError> {
        (**self).project(project_id)
    }

    fn images_for_project(&self, project_id: ProjectId) -> Result<Vec<Image>, ExportError> {
        (**self).images_for_project(project_id)
    }

    fn annotations_for_image(&self, image_id: ImageId) -> Result<Vec<Annotation>, ExportError> {
        (**self).annotations_for_image(image_id)
    }
}

/// Snapshots one project's images and their annotations.
///
/// An unknown project yields an empty dataset; telling "no images" apart
/// from "no such project" is left to the caller.
pub fn load_project<S: DatasetSource + ?Sized>(
    source: &S,
    project_id: ProjectId,
) -> Result<ProjectDataset, ExportError> {
    let images = source.images_for_project(project_id)?;
    let mut entries = Vec::with_capacity(images.len());

    for image in images {
        let annotations = source.annotations_for_image(image.id)?;
        entries.push(ImageEntry::new(image, annotations));
    }

    let dataset = ProjectDataset::new(entries);
    debug!(
        "loaded project {}: {} image(s), {} annotation(s)",
        project_id,
        dataset.image_count(),
        dataset.annotation_count()
    );
    Ok(dataset)
}
