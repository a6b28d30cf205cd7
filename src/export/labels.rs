//! Label indexing shared by all exporters.
//!
//! The index is built in one pass over every annotation of the export before
//! anything is written, so a label keeps the same position in `classes.txt`,
//! in every YOLO line and in the COCO category list for the whole call.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::ProjectDataset;

/// Distinct labels of one export, sorted ascending by raw string order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelIndex {
    labels: Vec<String>,
    positions: BTreeMap<String, usize>,
}

impl LabelIndex {
    /// Collects every label used by any annotation of the dataset,
    /// including annotations without coordinates.
    pub fn collect(dataset: &ProjectDataset) -> Self {
        Self::from_labels(dataset.annotations().map(|ann| ann.label.as_str()))
    }

    /// Builds an index from arbitrary label strings; duplicates collapse.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = labels.into_iter().collect();
        let labels: Vec<String> = distinct.into_iter().map(str::to_owned).collect();
        let positions = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.clone(), idx))
            .collect();

        Self { labels, positions }
    }

    /// Zero-based class index of a label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
