use annoexport::data::{Annotation, Image, Project, ProjectId};
use annoexport::export::export_pascal_voc;
use annoexport::store::JsonStore;

mod common;

struct VocObject {
    name: String,
    xmin: i64,
    ymin: i64,
    xmax: i64,
    ymax: i64,
}

fn child_text<'a>(node: roxmltree::Node<'a, 'a>, tag: &str) -> &'a str {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
        .unwrap_or_else(|| panic!("missing <{tag}>"))
}

fn parse_objects(xml: &str) -> (String, u32, u32, Vec<VocObject>) {
    let doc = roxmltree::Document::parse(xml).expect("well-formed VOC XML");
    let root = doc.root_element();
    assert!(root.has_tag_name("annotation"));
    assert_eq!(child_text(root, "folder"), "images");

    let size = root
        .children()
        .find(|c| c.has_tag_name("size"))
        .expect("size element");
    let width = child_text(size, "width").parse().expect("width");
    let height = child_text(size, "height").parse().expect("height");
    assert_eq!(child_text(size, "depth"), "3");

    let objects = root
        .children()
        .filter(|c| c.has_tag_name("object"))
        .map(|obj| {
            let bndbox = obj
                .children()
                .find(|c| c.has_tag_name("bndbox"))
                .expect("bndbox element");
            VocObject {
                name: child_text(obj, "name").to_string(),
                xmin: child_text(bndbox, "xmin").parse().expect("xmin"),
                ymin: child_text(bndbox, "ymin").parse().expect("ymin"),
                xmax: child_text(bndbox, "xmax").parse().expect("xmax"),
                ymax: child_text(bndbox, "ymax").parse().expect("ymax"),
            }
        })
        .collect();

    (child_text(root, "filename").to_string(), width, height, objects)
}

#[test]
fn archive_holds_one_document_per_annotated_image() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let out = temp.path().join("voc");

    let archive =
        export_pascal_voc(&common::sample_store(), ProjectId::new(1), &out).expect("export");
    assert_eq!(archive, temp.path().join("voc.zip"));

    let entries = common::zip_entries(&archive);
    let names: Vec<&str> = entries.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        [
            "Annotations/a.xml",
            "Annotations/b.xml",
            "Annotations/d.xml"
        ]
    );
}

#[test]
fn documents_carry_size_and_corner_boxes() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let archive = export_pascal_voc(
        &common::sample_store(),
        ProjectId::new(1),
        &temp.path().join("voc"),
    )
    .expect("export");
    let entries = common::zip_entries(&archive);

    let (file_name, width, height, objects) = parse_objects(&entries["Annotations/a.xml"]);
    assert_eq!(file_name, "a.jpg");
    assert_eq!((width, height), (100, 200));
    assert_eq!(objects.len(), 2);

    assert_eq!(objects[0].name, "cat");
    assert_eq!(
        (objects[0].xmin, objects[0].ymin, objects[0].xmax, objects[0].ymax),
        (10, 20, 40, 60)
    );
    assert_eq!(objects[1].name, "dog");
    assert_eq!(
        (objects[1].xmin, objects[1].ymin, objects[1].xmax, objects[1].ymax),
        (0, 0, 50, 100)
    );
}

#[test]
fn polygon_only_image_has_no_objects() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let archive = export_pascal_voc(
        &common::sample_store(),
        ProjectId::new(1),
        &temp.path().join("voc"),
    )
    .expect("export");
    let entries = common::zip_entries(&archive);

    let (file_name, _, _, objects) = parse_objects(&entries["Annotations/b.xml"]);
    assert_eq!(file_name, "b.png");
    assert!(objects.is_empty());
}

#[test]
fn unknown_size_is_written_as_zero() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let archive = export_pascal_voc(
        &common::sample_store(),
        ProjectId::new(1),
        &temp.path().join("voc"),
    )
    .expect("export");
    let entries = common::zip_entries(&archive);

    let (_, width, height, objects) = parse_objects(&entries["Annotations/d.xml"]);
    assert_eq!((width, height), (0, 0));
    assert_eq!(objects.len(), 1);
}

#[test]
fn special_characters_are_escaped() {
    let store = JsonStore::new()
        .with_project(Project::new(1u64, "escapes"))
        .with_image(Image::new(1u64, "r&d <1>.jpg").with_size(10, 10).in_project(1u64))
        .with_annotation(
            Annotation::new(1u64, 1u64, "\"salt\" & 'pepper'").with_xywh(1.9, 2.2, 3.5, 4.1),
        );

    let temp = tempfile::tempdir().expect("create temp dir");
    let archive =
        export_pascal_voc(&store, ProjectId::new(1), &temp.path().join("voc")).expect("export");
    let entries = common::zip_entries(&archive);

    let (file_name, _, _, objects) = parse_objects(&entries["Annotations/r&d <1>.xml"]);
    assert_eq!(file_name, "r&d <1>.jpg");
    assert_eq!(objects[0].name, "\"salt\" & 'pepper'");
    assert_eq!(
        (objects[0].xmin, objects[0].ymin, objects[0].xmax, objects[0].ymax),
        (1, 2, 5, 6)
    );
}
