#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use annoexport::data::{Annotation, AnnotationKind, Image, Project};
use annoexport::store::JsonStore;

pub const SAMPLE_STORE: &str = "tests/fixtures/sample_store.json";

/// Project 1 ("pets") holds four images:
///
/// - `a.jpg` 100x200 with a cat and a dog box
/// - `b.png` 640x480 with a single bird polygon
/// - `c.jpg` 64x64 with nothing on it
/// - `d.jpg` of unknown size with a cat box
///
/// Project 2 ("empty") has no images.
pub fn sample_store() -> JsonStore {
    JsonStore::new()
        .with_project(Project::new(1u64, "pets"))
        .with_project(Project::new(2u64, "empty"))
        .with_image(Image::new(1u64, "a.jpg").with_size(100, 200).in_project(1u64))
        .with_image(Image::new(2u64, "b.png").with_size(640, 480).in_project(1u64))
        .with_image(Image::new(3u64, "c.jpg").with_size(64, 64).in_project(1u64))
        .with_image(Image::new(4u64, "d.jpg").in_project(1u64))
        .with_annotation(Annotation::new(10u64, 1u64, "cat").with_xywh(10.0, 20.0, 30.0, 40.0))
        .with_annotation(Annotation::new(11u64, 1u64, "dog").with_xywh(0.0, 0.0, 50.0, 100.0))
        .with_annotation(Annotation::new(12u64, 2u64, "bird").with_kind(AnnotationKind::Polygon))
        .with_annotation(Annotation::new(13u64, 4u64, "cat").with_xywh(5.0, 5.0, 10.0, 10.0))
}

/// Reads every entry of a zip archive into `name -> contents`.
pub fn zip_entries(path: &Path) -> BTreeMap<String, String> {
    let file = File::open(path).expect("open archive");
    let mut archive = zip::ZipArchive::new(file).expect("read archive");

    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).expect("archive entry");
        let mut contents = String::new();
        entry
            .read_to_string(&mut contents)
            .expect("read archive entry");
        entries.insert(entry.name().to_string(), contents);
    }
    entries
}
