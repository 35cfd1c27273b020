//! End-to-end extraction through the engine entry points

use ctrlseg_core::{reassemble, LineSpan, SourceRef};
use ctrlseg_engine::{
    ControlExtractor, ControlId, ExecutionMode, ExtractorBuilder, Input, RawBlock, RunStatus,
};
use std::io::Cursor;

fn id(s: &str) -> ControlId {
    ControlId::parse(s).unwrap()
}

fn generic() -> ControlExtractor {
    ControlExtractor::for_profile("generic").unwrap()
}

#[test]
fn test_table_continued_on_next_page() {
    let text = "Requirement 2: Apply Secure Configurations\n\
| 2.3.1 For wireless environments, vendor defaults are changed at installation. |\n\
\x0c| 2.3.1 (continued) Default SNMP community strings are changed before use. |\n";

    let output = generic().process(Input::from_text(text)).unwrap();
    let record = output.record("2.3.1").unwrap();

    assert!(record.multi_table);
    assert!(record.sources.contains(&SourceRef::Table(1)));
    assert!(record.sources.contains(&SourceRef::Table(2)));
    assert_eq!(record.line_ranges, vec![LineSpan::new(0, 2)]);
    assert_eq!(output.report.multi_table_controls, vec![id("2.3.1")]);
}

#[test]
fn test_jsonl_non_adjacent_spans() {
    let jsonl = r#"{"text": "2.3.1 For wireless environments, vendor defaults are changed at installation.", "page": 5, "table": 1}
{"text": "2.3.2 For wireless environments, encryption keys are changed when personnel leave.", "page": 5, "table": 1}
{"text": "2.3.1 Default SNMP community strings are changed before use.", "page": 9, "table": 4}
"#;

    let output = generic().process(Input::from_jsonl(jsonl)).unwrap();
    let record = output.record("2.3.1").unwrap();

    assert!(record.multi_table);
    assert_eq!(record.sources, vec![SourceRef::Table(1), SourceRef::Table(4)]);
    assert_eq!(
        record.line_ranges,
        vec![LineSpan::new(0, 0), LineSpan::new(2, 2)]
    );
    assert!(record.content.contains("[continued]"));
    assert_eq!(output.report.controls_found, 2);
}

#[test]
fn test_blocks_and_reader_inputs_agree() {
    let text = "1.1 Access to systems is restricted to authorized users.\n1.2 Audit logs are retained for at least one year.\n";
    let extractor = generic();

    let from_reader = extractor
        .process(Input::from_reader(Cursor::new(text.as_bytes().to_vec())))
        .unwrap();
    let from_blocks = extractor
        .process(Input::from_blocks(vec![RawBlock::paragraph(text, 1)]))
        .unwrap();

    assert_eq!(from_reader.controls, from_blocks.controls);
    assert_eq!(from_reader.chunks, from_blocks.chunks);
}

fn large_document(controls: usize) -> String {
    let mut text = String::new();
    for i in 0..controls {
        let (a, b) = (i / 20 + 1, i % 20 + 1);
        text.push_str(&format!("{a}.{b} Requirement {i} is defined, documented and kept current.\n"));
        text.push_str(&format!("{a}.{b}.a Examine the documentation for requirement {i}.\n"));
        text.push_str("Purpose\n");
        text.push_str("Documented requirements reduce the chance of misconfiguration.\n");
        if i % 9 == 0 {
            text.push_str("\nPage 4\n\n");
        }
    }
    text
}

#[test]
fn test_execution_modes_produce_identical_output() {
    let text = large_document(150);
    let extractor = generic();

    let sequential = extractor
        .process_with_mode(Input::from_text(text.clone()), ExecutionMode::Sequential)
        .unwrap();
    let parallel = extractor
        .process_with_mode(Input::from_text(text), ExecutionMode::Parallel)
        .unwrap();

    assert_eq!(sequential.controls, parallel.controls);
    assert_eq!(sequential.chunks, parallel.chunks);
    assert_eq!(sequential.report.controls_found, 150);
    assert_eq!(sequential.report.warnings, parallel.report.warnings);
    assert_eq!(sequential.report.execution_mode, ExecutionMode::Sequential);
}

#[test]
fn test_chunks_reassemble_to_content() {
    let mut text = String::from("4.1 Strong cryptography protects cardholder data during transmission.\n");
    for i in 0..90 {
        text.push_str(&format!("Transmission path {i} uses a trusted certificate and a current protocol.\n"));
    }

    let extractor = ExtractorBuilder::new()
        .profile("generic")
        .target_tokens(300)
        .overlap_tokens(50)
        .build()
        .unwrap();
    let output = extractor.process(Input::from_text(text)).unwrap();
    let record = output.record("4.1").unwrap();

    let chunks: Vec<_> = output.chunks_for(&record.identifier).cloned().collect();
    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.token_count <= 360));
    assert_eq!(reassemble(&chunks), record.content);
    for (k, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.sequence_index, k);
    }
}

#[test]
fn test_prose_without_identifiers_fails_softly() {
    let output = generic()
        .process_text("This introduction explains how to read the document.")
        .unwrap();
    assert_eq!(output.report.status, RunStatus::Failed);
    assert_eq!(output.report.lines, 1);
    assert!(output.controls.is_empty());
}

#[test]
fn test_profile_file_builder() {
    let source = ctrlseg_core::profile::embedded_profile_source("generic")
        .unwrap()
        .replace("code = \"generic\"", "code = \"in-house\"");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in-house.toml");
    std::fs::write(&path, source).unwrap();

    let extractor = ExtractorBuilder::new()
        .profile_file(&path)
        .sequential()
        .build()
        .unwrap();
    let output = extractor
        .process_text("1.1 Access to systems is restricted to authorized users.")
        .unwrap();

    assert_eq!(extractor.profile().code(), "in-house");
    assert_eq!(output.report.profile, "in-house");
    assert_eq!(output.report.execution_mode, ExecutionMode::Sequential);
}
