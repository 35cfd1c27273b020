//! End-to-end tests of the core pipeline with the embedded profiles

use ctrlseg_core::{
    count_tokens, dedup, reassemble, ControlId, LineSpan, LineStore, MappingTuple, Profile,
    QualityGrade, RawBlock, ScanStop, SectionKind, SourceRef,
};

fn id(s: &str) -> ControlId {
    ControlId::parse(s).unwrap()
}

fn pci() -> Profile {
    Profile::from_code("pci-dss").unwrap()
}

const REQUIREMENT_PAGE: &[&str] = &[
    "Payment Card Industry Data Security Standard: Requirements and Testing Procedures, v4.0",
    "Requirement 1: Install and Maintain Network Security Controls",
    "Defined Approach Requirements    Defined Approach Testing Procedures",
    "1.2.7 Configurations of NSCs are reviewed at least once every six months to confirm they are relevant and effective.",
    "1.2.7.a Examine documentation to verify procedures are defined for reviewing configurations of NSCs.",
    "1.2.7.b Examine documentation and interview personnel.",
    "Purpose",
    "Reviews of configurations help ensure that controls remain relevant.",
    "Page 12",
    "Good Practice",
    "Configuration reviews should be scheduled.",
    "1.2.8 Configuration files for NSCs are secured from unauthorized access and kept consistent with active network configurations.",
    "1.2.8 Examine NSC configuration files to verify they are restricted from unauthorized access.",
];

#[test]
fn test_requirement_page_end_to_end() {
    let profile = pci();
    let store = LineStore::from_texts(REQUIREMENT_PAGE);
    let detector = profile.detector();

    let candidates = detector.detect(&store);
    let lines: Vec<_> = candidates.iter().map(|c| c.line_index).collect();
    assert_eq!(lines, vec![3, 11, 12]);

    let spans = detector.resolve(&store, candidates);
    assert_eq!(spans[0].stop, ScanStop::DocumentStart);
    assert_eq!(spans[1].stop, ScanStop::RunningHeader);
    assert_eq!(spans[2].stop, ScanStop::IdentifierLine);

    let assembly = profile.assembler().assemble(&store, &spans);
    assert!(assembly.warnings.is_empty());
    let records = assembly.into_map();
    assert_eq!(records.len(), 2);

    let first = profile.scorer().apply(profile.classifier().classify(records[&id("1.2.7")].clone()));
    assert_eq!(first.line_ranges, vec![LineSpan::new(0, 8)]);
    assert!(!first.content.contains("Page 12"));
    assert!(first.has_section(SectionKind::Requirement));
    assert!(first.has_section(SectionKind::TestingProcedure));
    assert!(first.has_section(SectionKind::Purpose));
    assert!(!first.has_section(SectionKind::GoodPractice));

    let quality = first.quality.as_ref().unwrap();
    assert_eq!(quality.identifier_occurrences, 3);
    assert_eq!(quality.score, 80.0);
    assert_eq!(quality.grade, QualityGrade::Good);

    // the repeated identifier line is a testing procedure and merges into one range
    let second = &records[&id("1.2.8")];
    assert_eq!(second.line_ranges, vec![LineSpan::new(9, 12)]);
    assert!(second.content.starts_with("Good Practice"));
    assert!(!second.multi_table);
}

#[test]
fn test_mid_sentence_reference_yields_no_candidate() {
    let profile = pci();
    let store = LineStore::from_texts(&["refer to control 1.2.8 for details"]);
    assert!(profile.detector().detect(&store).is_empty());

    let store = LineStore::from_texts(&["1.2.8 Configuration files for NSCs are..."]);
    let candidates = profile.detector().detect(&store);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].identifier, id("1.2.8"));
}

#[test]
fn test_multi_table_continuation() {
    let profile = pci();
    let store = LineStore::ingest(vec![
        RawBlock::table_cell("2.3.1 Wireless vendor defaults are changed at installation.", 20, 1),
        RawBlock::table_cell("2.3.1.a Interview responsible personnel.", 20, 1),
        RawBlock::paragraph("2.3.2 For wireless environments connected to the CDE, keys are changed.", 20),
        RawBlock::table_cell("2.3.1 (continued) Default SNMP community strings are changed.", 21, 4),
    ]);

    let detector = profile.detector();
    let spans = detector.resolve(&store, detector.detect(&store));
    let records = profile.assembler().assemble(&store, &spans).into_map();
    let record = &records[&id("2.3.1")];

    assert!(record.multi_table);
    assert_eq!(record.line_ranges, vec![LineSpan::new(0, 1), LineSpan::new(3, 3)]);
    assert_eq!(record.sources, vec![SourceRef::Table(1), SourceRef::Table(4)]);
    assert_eq!(record.content.matches("[continued]").count(), 1);
}

#[test]
fn test_empty_input_produces_no_controls() {
    let profile = pci();
    let store = LineStore::ingest(vec![RawBlock::paragraph("   \n\n", 1)]);
    let detector = profile.detector();
    let spans = detector.resolve(&store, detector.detect(&store));
    assert!(profile.assembler().assemble(&store, &spans).outcomes.is_empty());
}

#[test]
fn test_620_token_control_chunks_within_budget() {
    let profile = pci();
    let body: Vec<String> = (0..123).map(|i| format!("Sentence {i} holds text.")).collect();
    let content = format!("1.2.8 {}", body.join(" "));
    assert_eq!(count_tokens(&content), 620);

    let chunks = profile.splitter().split_text(&id("1.2.8"), &content, &[]);

    assert!(chunks.len() >= 3);
    for (k, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.sequence_index, k);
        assert!(chunk.token_count <= 360);
    }
    assert_eq!(chunks[0].overlap_prefix_len, 0);
    assert_eq!(reassemble(&chunks), content);
}

#[test]
fn test_dedup_500_tuples_with_37_duplicates() {
    let unique: Vec<MappingTuple> = (0..463)
        .map(|i| MappingTuple::new(format!("{}.{}.{}", i / 100 + 1, i / 10 % 10, i % 10), "maps_to", format!("R-{i}")))
        .collect();
    let mut tuples = unique.clone();
    // one tuple repeated 10 times, 27 more repeated once
    tuples.extend(std::iter::repeat(unique[5].clone()).take(10));
    tuples.extend(unique[100..127].iter().cloned());
    assert_eq!(tuples.len(), 500);

    let outcome = dedup(tuples);
    assert_eq!(outcome.final_count(), 463);
    assert_eq!(outcome.removed, 37);
    assert_eq!(outcome.original_count() - outcome.removed, outcome.final_count());
    assert_eq!(outcome.unique, unique);
    assert_eq!(outcome.group_sizes().iter().filter(|&&s| s == 11).count(), 1);
}

#[test]
fn test_trailing_dot_numbering_yields_one_record_per_control() {
    let profile = Profile::from_code("generic").unwrap();
    let store = LineStore::from_texts(&[
        "1.1. Access control policy is documented and approved by management.",
        "1.2. Audit logs are retained for at least one year.",
        "1.2.a Examine the log retention settings.",
    ]);
    let detector = profile.detector();
    let spans = detector.resolve(&store, detector.detect(&store));
    let records = profile.assembler().assemble(&store, &spans).into_map();

    assert_eq!(records.len(), 2);
    let first = profile.classifier().classify(records[&id("1.1")].clone());
    assert_eq!(first.line_ranges, vec![LineSpan::new(0, 0)]);
    assert!(first.has_section(SectionKind::Requirement));
    assert!(!first.content.contains("Audit logs"));
    assert_eq!(records[&id("1.2")].line_ranges, vec![LineSpan::new(1, 2)]);
}
