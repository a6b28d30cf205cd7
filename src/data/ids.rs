//! Newtype IDs for type-safe identification of stored records.
//!
//! Projects, images and annotations are all keyed by integers in the
//! persistence layer; wrapping them keeps an image ID from being passed where
//! a project ID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            #[inline]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value.
            #[inline]
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self::new(id)
            }
        }
    };
}

record_id!(
    /// Identifier of a project (a named collection of images).
    ProjectId
);

record_id!(
    /// Identifier of an image, unique within a data store.
    ImageId
);

record_id!(
    /// Identifier of a stored annotation.
    ///
    /// Exporters that renumber annotations (COCO) do not reuse this value.
    AnnotationId
);
