//! Tests of the public API surface

use ctrlseg_api::{
    process_text_with_profile, reconcile, ApiError, Config, ControlProcessor, ExecutionMode,
    Input, MappingTuple, RunStatus,
};

const DOCUMENT: &str = "\
1.2.7 Configurations of NSCs are reviewed at least once every six months.
1.2.7.a Examine documentation to verify procedures are defined.
Purpose
Reviews help ensure that controls remain relevant.
1.2.8 Configuration files for NSCs are secured from unauthorized access.
1.2.8.a Examine configuration files to verify they are restricted.
";

#[test]
fn test_artifacts_for_each_control() {
    let output = process_text_with_profile(DOCUMENT, "pci-dss").unwrap();

    assert_eq!(output.controls.len(), 2);
    assert!(output.failures.is_empty());
    let first = output.control("1.2.7").unwrap();
    assert!(first.sections["requirement"]);
    assert!(first.sections["testing_procedure"]);
    assert!(first.quality_score > 0.0);

    // Guidance above an identifier line belongs to the control that follows it
    let second = output.control("1.2.8").unwrap();
    assert!(!first.sections["purpose"]);
    assert!(second.sections["purpose"]);

    let doc = second.to_flat_document();
    assert_eq!(doc["identifier"], "1.2.8");
    assert_eq!(doc["section.purpose"], "true");
    assert_eq!(doc["multi_table"], "false");
}

#[test]
fn test_chunk_artifacts_carry_control_metadata() {
    let output = process_text_with_profile(DOCUMENT, "pci-dss").unwrap();

    assert_eq!(output.chunks.len(), 2);
    for chunk in &output.chunks {
        let control = output.control(&chunk.metadata.control_id).unwrap();
        assert_eq!(chunk.metadata.quality_score, control.quality_score);
        assert_eq!(chunk.metadata.sequence_index, 0);
        assert_eq!(chunk.text, control.content);
        assert_eq!(chunk.metadata.chunk_id, format!("{}#0", control.identifier));
    }
}

#[test]
fn test_modes_agree() {
    let processor = ControlProcessor::with_profile("generic").unwrap();
    let sequential = processor
        .process_with_mode(Input::from_text(DOCUMENT), ExecutionMode::Sequential)
        .unwrap();
    let parallel = processor
        .process_with_mode(Input::from_text(DOCUMENT), ExecutionMode::Parallel)
        .unwrap();
    assert_eq!(sequential.controls, parallel.controls);
    assert_eq!(sequential.chunks, parallel.chunks);
}

#[test]
fn test_unknown_profile_is_engine_error() {
    let err = ControlProcessor::with_profile("nist-800-53").err().unwrap();
    assert!(matches!(err, ApiError::Engine(_)));
}

#[test]
fn test_invalid_chunking_is_config_error() {
    let err = Config::builder()
        .target_tokens(10)
        .overlap_tokens(20)
        .build_processor()
        .err()
        .unwrap();
    assert!(matches!(err, ApiError::Config(_)));
}

#[test]
fn test_empty_document_reports_failure() {
    let processor = ControlProcessor::new().unwrap();
    let output = processor.process(Input::from_bytes(Vec::new())).unwrap();
    assert_eq!(output.report.status, RunStatus::Failed);
    assert!(output.controls.is_empty());
}

#[test]
fn test_reconcile_500_with_37_duplicates() {
    let mut tuples: Vec<MappingTuple> = (0..463)
        .map(|i| MappingTuple::new(format!("1.{}.{}", i / 10 + 1, i % 10 + 1), "maps_to", format!("rule-{i}")))
        .collect();
    for i in 0..37 {
        tuples.push(tuples[i * 3].clone());
    }

    let report = reconcile(tuples);
    assert_eq!(report.original_count, 500);
    assert_eq!(report.removed, 37);
    assert_eq!(report.final_count, 463);
    assert!(report.invariant_holds);

    let again = reconcile(report.unique.clone());
    assert_eq!(again.removed, 0);
}

#[cfg(feature = "serde")]
#[test]
fn test_output_serializes() {
    let output = process_text_with_profile(DOCUMENT, "generic").unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["controls"][0]["identifier"], "1.2.7");
    assert_eq!(json["report"]["status"], "passed");
}

#[test]
fn test_processor_debug_names_profile_and_mode() {
    let processor = Config::builder()
        .profile("generic")
        .execution_mode(ExecutionMode::Sequential)
        .build_processor()
        .unwrap();
    let debug = format!("{processor:?}");
    assert!(debug.contains("generic"));
    assert!(debug.contains("Sequential"));
}
