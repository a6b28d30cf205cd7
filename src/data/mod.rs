//! Data model consumed by the export engine.
//!
//! Records (`Project`, `Image`, `Annotation`) come from the persistence
//! layer. Boxes are typed by coordinate space so that pixel values and
//! normalized values cannot be confused.
//!
//! # Example
//!
//! ```
//! use annoexport::data::{Annotation, Image, ImageEntry, ProjectDataset};
//!
//! let dataset = ProjectDataset::new(vec![ImageEntry::new(
//!     Image::new(1u64, "a.jpg").with_size(100, 200),
//!     vec![Annotation::new(1u64, 1u64, "cat").with_xywh(10.0, 20.0, 30.0, 40.0)],
//! )]);
//! assert_eq!(dataset.annotation_count(), 1);
//! ```

mod bbox;
mod ids;
mod model;
mod space;

pub use bbox::{BBox, CenterBox};
pub use ids::{AnnotationId, ImageId, ProjectId};
pub use model::{Annotation, AnnotationKind, Image, ImageEntry, Point, Project, ProjectDataset};
pub use space::{Normalized, Pixel};
