#![allow(dead_code)]

use annoexport::data::{Annotation, AnnotationKind, Image, ImageEntry, ProjectDataset};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("cat".to_string()),
        Just("dog".to_string()),
        Just("Zebra".to_string()),
        Just("traffic light".to_string()),
        "[a-z]{1,6}",
    ]
}

pub fn arb_kind() -> impl Strategy<Value = AnnotationKind> {
    prop_oneof![
        6 => Just(AnnotationKind::Bbox),
        1 => Just(AnnotationKind::Polygon),
        1 => Just(AnnotationKind::Point),
    ]
}

/// An annotation whose box, when present, lies inside a `w` x `h` image.
pub fn arb_annotation(image_w: u32, image_h: u32) -> impl Strategy<Value = AnnotationSeed> {
    let w = f64::from(image_w);
    let h = f64::from(image_h);
    (
        arb_label(),
        arb_kind(),
        prop::option::weighted(0.9, (0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64)),
    )
        .prop_map(move |(label, kind, rel)| AnnotationSeed {
            label,
            kind,
            xywh: rel.map(|(rx, ry, rw, rh)| {
                let x = rx * w;
                let y = ry * h;
                (x, y, rw * (w - x), rh * (h - y))
            }),
        })
}

#[derive(Clone, Debug)]
pub struct AnnotationSeed {
    pub label: String,
    pub kind: AnnotationKind,
    pub xywh: Option<(f64, f64, f64, f64)>,
}

#[derive(Clone, Debug)]
struct ImageSeed {
    width: u32,
    height: u32,
    annotations: Vec<AnnotationSeed>,
}

fn arb_image(max_annotations: usize) -> impl Strategy<Value = ImageSeed> {
    (1u32..=2048, 1u32..=2048).prop_flat_map(move |(width, height)| {
        prop::collection::vec(arb_annotation(width, height), 0..=max_annotations).prop_map(
            move |annotations| ImageSeed {
                width,
                height,
                annotations,
            },
        )
    })
}

/// A dataset of up to `max_images` sized images, each with up to
/// `max_annotations` annotations. IDs are assigned sequentially from 1.
pub fn arb_dataset(max_images: usize, max_annotations: usize) -> BoxedStrategy<ProjectDataset> {
    prop::collection::vec(arb_image(max_annotations), 0..=max_images)
        .prop_map(|images| {
            let mut next_ann_id = 1u64;
            let entries = images
                .into_iter()
                .enumerate()
                .map(|(idx, seed)| {
                    let image_id = idx as u64 + 1;
                    let image = Image::new(image_id, format!("img_{image_id}.jpg"))
                        .with_size(seed.width, seed.height);
                    let annotations = seed
                        .annotations
                        .into_iter()
                        .map(|ann| {
                            let mut annotation = Annotation::new(next_ann_id, image_id, ann.label)
                                .with_kind(ann.kind);
                            if let Some((x, y, w, h)) = ann.xywh {
                                annotation = annotation.with_xywh(x, y, w, h);
                            }
                            next_ann_id += 1;
                            annotation
                        })
                        .collect();
                    ImageEntry::new(image, annotations)
                })
                .collect();
            ProjectDataset::new(entries)
        })
        .boxed()
}
