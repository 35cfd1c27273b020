//! Property-based tests for the pipeline invariants
//!
//! - spans and line ranges are sorted and never overlap
//! - chunks reassemble to the original content byte for byte
//! - deduplication is idempotent and keeps its count invariant

use ctrlseg_core::assembler::ranges_are_ordered;
use ctrlseg_core::{
    count_tokens, dedup, reassemble, ChunkOptions, ChunkSplitter, ControlId, LineStore,
    MappingTuple, Profile,
};
use proptest::prelude::*;

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..4, 1u32..4, 1u32..6)
            .prop_map(|(a, b, c)| format!("{a}.{b}.{c} Requirement text for the control")),
        (1u32..4, 1u32..4, 1u32..6).prop_map(|(a, b, c)| format!("{a}.{b}.{c}.a Examine evidence")),
        Just("Purpose".to_string()),
        Just("Page 4".to_string()),
        Just("•".to_string()),
        Just(String::new()),
        Just("short tail.".to_string()),
        "[a-z ]{20,60}",
    ]
}

#[test]
fn proptest_spans_sorted_and_disjoint() {
    let profile = Profile::from_code("pci-dss").unwrap();
    let detector = profile.detector();
    let assembler = profile.assembler();

    proptest!(|(lines in prop::collection::vec(line_strategy(), 0..80))| {
        let store = LineStore::from_texts(&lines);
        let spans = detector.resolve(&store, detector.detect(&store));

        for pair in spans.windows(2) {
            prop_assert!(pair[0].span.end < pair[1].span.start);
        }
        for span in &spans {
            prop_assert!(span.span.start <= span.candidate.line_index);
            prop_assert!(span.candidate.line_index <= span.span.end);
        }

        let assembly = assembler.assemble(&store, &spans);
        for record in assembly.records() {
            prop_assert!(!record.line_ranges.is_empty());
            prop_assert!(ranges_are_ordered(&record.line_ranges));
        }
    });
}

#[test]
fn proptest_chunks_round_trip() {
    let strategy = (10usize..120)
        .prop_flat_map(|target| (Just(target), 0..target, "[a-z.!? \n]{0,2000}"));

    proptest!(|((target, overlap, content) in strategy)| {
        let splitter = ChunkSplitter::new(ChunkOptions {
            target_tokens: target,
            overlap_tokens: overlap,
            ..ChunkOptions::default()
        });
        let chunks = splitter.split_text(&ControlId::parse("1.1").unwrap(), &content, &[]);

        prop_assert!(!chunks.is_empty());
        prop_assert_eq!(reassemble(&chunks), content.clone());
        for chunk in &chunks {
            prop_assert_eq!(chunk.token_count, count_tokens(&chunk.content));
            prop_assert!(chunk.token_count <= splitter.options().max_tokens());
        }
    });
}

#[test]
fn proptest_dedup_idempotent() {
    let tuple = ("[ab]", "[xy]", "[0-2]").prop_map(|(s, r, d)| MappingTuple::new(s, r, d));

    proptest!(|(tuples in prop::collection::vec(tuple, 0..200))| {
        let first = dedup(tuples.clone());
        prop_assert_eq!(first.original_count(), tuples.len());
        prop_assert_eq!(first.original_count() - first.removed, first.final_count());

        let second = dedup(first.unique.clone());
        prop_assert_eq!(second.removed, 0);
        prop_assert_eq!(second.unique, first.unique);
    });
}

#[test]
fn proptest_quality_score_deterministic() {
    let profile = Profile::from_code("generic").unwrap();
    let detector = profile.detector();

    proptest!(ProptestConfig::with_cases(32), |(lines in prop::collection::vec(line_strategy(), 1..40))| {
        let store = LineStore::from_texts(&lines);
        let spans = detector.resolve(&store, detector.detect(&store));
        for record in profile.assembler().assemble(&store, &spans).records() {
            let classified = profile.classifier().classify(record.clone());
            let a = profile.scorer().score(&classified);
            let b = profile.scorer().score(&classified.clone());
            prop_assert_eq!(a.clone(), b);
            prop_assert!((0.0..=100.0).contains(&a.score));
        }
    });
}
