/// Export integration tests: packs written to disk and read back.

use glowmini::core::export::{self, ExportError, ExportedDocument};
use glowmini::core::pipeline::PackEngine;
use glowmini::schema::pack::{ExternalArtifacts, MediaPack};
use glowmini::schema::request::{GenerationRequest, Language};

fn engine() -> PackEngine {
    PackEngine::with_builtin_catalogs().unwrap()
}

#[test]
fn round_trip_reproduces_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let pack = engine().generate(
        &GenerationRequest::new("Tự động hóa quy trình tạo video AI").seed(Some(42)),
    );

    let path = export::persist(&pack, dir.path()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let doc = ExportedDocument::parse(&text).unwrap();

    assert_eq!(doc.outline, pack.outline);
    assert_eq!(doc.script, pack.script);
    assert_eq!(doc.shotlist, pack.shotlist);
    assert_eq!(doc.prompts, pack.prompts);
    assert!(text.starts_with("# GlowMiniAI Output Pack\nTopic: Tự động hóa quy trình tạo video AI\n"));
    assert!(text.contains("\"engine\": \"offline_mock_adaptive\""));
}

#[test]
fn filename_is_stamp_plus_sanitized_topic() {
    let dir = tempfile::tempdir().unwrap();
    let pack = engine().generate_at(
        &GenerationRequest::new("Plan: A/B <test>!!").language(Language::En),
        "20260316_101500".into(),
    );
    let path = export::persist(&pack, dir.path()).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "20260316_101500_Plan_AB_test.md"
    );
    let stem = path.file_stem().unwrap().to_str().unwrap();
    assert!(stem
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.')));
}

#[test]
fn symbol_only_topic_falls_back_to_pack() {
    let dir = tempfile::tempdir().unwrap();
    let pack = engine().generate_at(&GenerationRequest::new("???"), "20260316_101500".into());
    let path = export::persist(&pack, dir.path()).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "20260316_101500_pack.md"
    );
}

#[test]
fn same_second_exports_do_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine();
    let req = GenerationRequest::new("workflow").seed(Some(1));
    let first = engine.generate_at(&req, "20260316_101500".into());
    let second = engine.generate_at(&req.clone().seed(Some(2)), "20260316_101500".into());

    let a = export::persist(&first, dir.path()).unwrap();
    let b = export::persist(&second, dir.path()).unwrap();
    let c = export::persist(&second, dir.path()).unwrap();

    assert_eq!(a.file_name().unwrap(), "20260316_101500_workflow.md");
    assert_eq!(b.file_name().unwrap(), "20260316_101500_workflow_2.md");
    assert_eq!(c.file_name().unwrap(), "20260316_101500_workflow_3.md");

    let first_doc = ExportedDocument::parse(&std::fs::read_to_string(&a).unwrap()).unwrap();
    assert_eq!(first_doc.shotlist, first.shotlist);
}

#[test]
fn creates_missing_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("packs").join("2026");
    let pack = engine().generate(&GenerationRequest::new("học toán"));
    let path = export::persist(&pack, &nested).unwrap();
    assert!(path.starts_with(&nested));
    assert!(path.exists());
}

#[test]
fn unwritable_target_is_an_error_and_pack_survives() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "occupied").unwrap();

    let pack = engine().generate(&GenerationRequest::new("marketing").seed(Some(3)));
    let err = export::persist(&pack, &blocker).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
    assert!(!pack.outline.is_empty());
    assert!(export::render(&pack).is_ok());
}

#[test]
fn topic_with_section_heading_is_not_silently_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let pack = engine().generate(&GenerationRequest::new("ghi chú\n## Script\nmẹo").seed(Some(42)));

    let path = export::persist(&pack, dir.path()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(matches!(
        ExportedDocument::parse(&text),
        Err(ExportError::AmbiguousSection("## Script"))
    ));
}

#[test]
fn reply_with_own_headings_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = ExternalArtifacts {
        mode: "Education".to_string(),
        outline: "## Tips\n1. keep it short\n".to_string(),
        script: "Hook.\n### Beat two\nBody.".to_string(),
        shotlist: "S1: wide\nS2: close".to_string(),
        prompts: "GLOBAL LOOK\n## Meta\nnot metadata\n".to_string(),
    };
    let pack = MediaPack::from_external(
        &GenerationRequest::new("ghi chú").seed(Some(9)),
        artifacts,
        "external",
        "20260316_101500".into(),
    );

    let path = export::persist(&pack, dir.path()).unwrap();
    let doc = ExportedDocument::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc.outline, pack.outline);
    assert_eq!(doc.script, pack.script);
    assert_eq!(doc.shotlist, pack.shotlist);
    assert_eq!(doc.prompts, pack.prompts);
}
