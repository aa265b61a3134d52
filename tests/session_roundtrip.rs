use std::fs;

use boxmark::config::Settings;
use boxmark::io::labels::{decode_manifest, encode_labels};
use boxmark::io::media::LoadedImage;
use boxmark::io::serialization::{import_labels, import_registry, SaveOutcome};
use boxmark::{AnnotationSession, BoundingBox, ClassId, ClassRegistry};

fn settings_in(dir: &std::path::Path) -> Settings {
    Settings {
        results_dir: dir.join("results"),
        ..Settings::default()
    }
}

fn blank_pixels(width: u32, height: u32) -> LoadedImage {
    LoadedImage {
        width,
        height,
        pixels: vec![255; (width * height * 4) as usize],
    }
}

fn draw(session: &mut AnnotationSession, from: (f64, f64), to: (f64, f64)) {
    session.pointer_down(from.0, from.1).expect("pointer down");
    session.pointer_move((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0).expect("pointer move");
    session.pointer_move(to.0, to.1).expect("pointer move");
    session.pointer_up(to.0, to.1).expect("pointer up");
}

#[test]
fn draw_commit_encode_reference_example() {
    let mut session = AnnotationSession::new(ClassRegistry::new());
    session.load_image("cat.jpg", 800, 600);
    session.resize_viewport(800.0, 600.0).expect("resize");

    draw(&mut session, (100.0, 100.0), (300.0, 400.0));
    let bbox = session.commit_label("cat").expect("commit");

    assert_eq!(session.registry().entries(), vec![("cat".to_string(), ClassId(0))]);
    assert_eq!(bbox, BoundingBox::new(100.0, 100.0, 200.0, 300.0, ClassId(0)));

    let image = session.image().expect("image loaded");
    let text = encode_labels(image, session.registry()).expect("encode");
    assert_eq!(text, "0 0.25 0.41666667 0.25 0.5\n");
}

#[test]
fn save_then_restart_keeps_class_ids() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let settings = settings_in(temp.path());

    // First session: two classes on one image.
    let mut session = AnnotationSession::new(ClassRegistry::new());
    session.load_image("/shots/street.jpg", 400, 200);
    session.resize_viewport(800.0, 400.0).expect("resize");
    draw(&mut session, (0.0, 0.0), (200.0, 200.0));
    session.commit_label("car").expect("commit car");
    draw(&mut session, (600.0, 300.0), (400.0, 100.0));
    session.commit_label("person").expect("commit person");
    assert!(session.can_save());

    let outcome = session.save(&settings, &blank_pixels(400, 200)).expect("save");
    let SaveOutcome::Saved(files) = outcome else {
        panic!("expected a save");
    };
    assert!(!session.can_save());
    assert!(files.image.is_file());
    assert_eq!(
        fs::read_to_string(&files.labels).expect("read labels"),
        "0 0.125 0.25 0.25 0.5\n1 0.625 0.5 0.25 0.5\n"
    );

    let manifest = decode_manifest(&fs::read_to_string(&files.manifest).expect("read manifest"))
        .expect("parse manifest");
    assert_eq!(manifest.nc, 2);
    assert_eq!(manifest.names, vec!["car", "person"]);

    // Second session: restored registry continues after the highest id.
    let mut registry = ClassRegistry::new();
    assert!(import_registry(&settings.registry_path(), &mut registry).expect("restore"));
    let mut session = AnnotationSession::new(registry);
    session.load_image("/shots/park.jpg", 400, 200);
    session.resize_viewport(400.0, 200.0).expect("resize");
    draw(&mut session, (10.0, 10.0), (20.0, 20.0));
    assert_eq!(session.commit_label("dog").expect("commit dog").class_id, ClassId(2));
    draw(&mut session, (30.0, 30.0), (40.0, 40.0));
    assert_eq!(session.commit_label("person").expect("commit person").class_id, ClassId(1));

    let boxes = import_labels(&files.labels, 400, 200, session.registry()).expect("reimport");
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[1], BoundingBox::new(200.0, 50.0, 100.0, 100.0, ClassId(1)));
}

#[test]
fn save_with_no_boxes_does_nothing() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let settings = settings_in(temp.path());

    let mut session = AnnotationSession::new(ClassRegistry::new());
    session.load_image("empty.png", 10, 10);
    let outcome = session.save(&settings, &blank_pixels(10, 10)).expect("save");
    assert_eq!(outcome, SaveOutcome::NothingToSave);
    assert!(!settings.results_dir.exists());
}

#[test]
fn manifest_orders_restored_names_by_id() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = temp.path().join("class_to_id_mapping.json");
    fs::write(&path, r#"{"dog": 1, "cat": 0, "bird": 2}"#).expect("write mapping");

    let mut registry = ClassRegistry::new();
    import_registry(&path, &mut registry).expect("restore");
    assert_eq!(registry.names_sorted_by_id(), vec!["cat", "dog", "bird"]);
}

#[test]
fn restore_rejects_mapping_near_id_limit() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = temp.path().join("class_to_id_mapping.json");
    fs::write(&path, r#"{"a": 4294967294}"#).expect("write mapping");

    let mut registry = ClassRegistry::new();
    assert!(import_registry(&path, &mut registry).is_err());
    assert!(registry.is_empty());
    assert_eq!(registry.resolve("b"), ClassId(0));
}
