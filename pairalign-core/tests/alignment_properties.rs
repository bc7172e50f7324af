//! Property-based tests for the engine cutoff and the NICE renderer.

use pairalign_core::render::{infix_target_offset, CoordRange};
use pairalign_core::{
    render_alignment, AlignConfig, AlignEngine, AlignMode, AlignRequest, AlignTask,
    EditDistanceEngine, EditOp, ScoreCutoff, BLOCK_WIDTH, NO_ALIGNMENT,
};
use proptest::prelude::*;

fn arb_dna(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 1..max_len)
}

fn arb_mode() -> impl Strategy<Value = AlignMode> {
    prop_oneof![
        Just(AlignMode::Global),
        Just(AlignMode::Prefix),
        Just(AlignMode::Infix),
    ]
}

fn arb_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        Just(EditOp::Match),
        Just(EditOp::Mismatch),
        Just(EditOp::Insert),
        Just(EditOp::Delete),
    ]
}

fn score(query: &[u8], target: &[u8], mode: AlignMode, task: AlignTask, cutoff: ScoreCutoff) -> i32 {
    let request = AlignRequest::new(query, target, AlignConfig::new(mode, task, cutoff));
    EditDistanceEngine::new().align(&request).score
}

mod cutoff_properties {
    use super::*;

    proptest! {
        #[test]
        fn raising_cutoff_reveals_distance(
            query in arb_dna(24),
            target in arb_dna(32),
            mode in arb_mode(),
        ) {
            let distance = score(&query, &target, mode, AlignTask::Distance, ScoreCutoff::UNBOUNDED);
            prop_assert!(distance >= 0);
            let distance = distance as u32;

            for k in 0..=distance + 2 {
                let bounded = score(&query, &target, mode, AlignTask::Distance, ScoreCutoff::bounded(k));
                if k < distance {
                    prop_assert_eq!(bounded, NO_ALIGNMENT);
                } else {
                    prop_assert_eq!(bounded, distance as i32);
                }
            }
        }

        #[test]
        fn task_does_not_change_score(
            query in arb_dna(20),
            target in arb_dna(20),
            mode in arb_mode(),
        ) {
            let distance = score(&query, &target, mode, AlignTask::Distance, ScoreCutoff::UNBOUNDED);
            prop_assert_eq!(score(&query, &target, mode, AlignTask::Location, ScoreCutoff::UNBOUNDED), distance);
            prop_assert_eq!(score(&query, &target, mode, AlignTask::Path, ScoreCutoff::UNBOUNDED), distance);
        }

        #[test]
        fn path_cost_equals_score(query in arb_dna(20), target in arb_dna(20), mode in arb_mode()) {
            let request = AlignRequest::new(
                &query,
                &target,
                AlignConfig::new(mode, AlignTask::Path, ScoreCutoff::UNBOUNDED),
            );
            let result = EditDistanceEngine::new().align(&request);
            let script = result.edit_script.clone().unwrap();

            let cost = script.iter().filter(|op| **op != EditOp::Match).count();
            let query_used = script.iter().filter(|op| op.consumes_query()).count();

            prop_assert_eq!(cost as i32, result.score);
            prop_assert_eq!(query_used, query.len());
        }
    }
}

mod render_properties {
    use super::*;

    proptest! {
        #[test]
        fn all_match_ranges_are_contiguous(sequence in arb_dna(300)) {
            let script = vec![EditOp::Match; sequence.len()];
            let last = sequence.len() - 1;
            let blocks = render_alignment(&sequence, &sequence, &script, last, AlignMode::Global).unwrap();

            prop_assert_eq!(blocks.len(), (sequence.len() + BLOCK_WIDTH - 1) / BLOCK_WIDTH);

            let mut expected_start = 0i64;
            for block in &blocks {
                prop_assert!(block.markers.iter().all(|&m| m == b'|'));
                prop_assert_eq!(block.target_range, block.query_range);
                prop_assert_eq!(block.target_range.start, expected_start);
                expected_start = block.target_range.end + 1;
            }
            prop_assert_eq!(
                blocks.last().map(|b| b.target_range.end),
                Some(last as i64)
            );
        }

        #[test]
        fn infix_offset_is_anchor_minus_target_ops(
            script in prop::collection::vec(arb_op(), 1..120),
            slack in 0usize..20,
        ) {
            let target_ops = script.iter().filter(|op| op.consumes_target()).count();
            let query_ops = script.iter().filter(|op| op.consumes_query()).count();
            let anchor = target_ops.saturating_sub(1) + slack;

            prop_assert_eq!(
                infix_target_offset(&script, anchor),
                anchor as i64 - target_ops as i64
            );

            let target = vec![b'A'; anchor + 1];
            let query = vec![b'C'; query_ops];
            let blocks = render_alignment(&query, &target, &script, anchor, AlignMode::Infix).unwrap();

            for block in &blocks {
                prop_assert!(block.target_range.start >= 0);
                prop_assert!(block.query_range.start >= 0);
            }
            if target_ops > 0 {
                let end = blocks.iter().map(|b| b.target_range.end).max();
                prop_assert_eq!(end, Some(anchor as i64));
            }
        }
    }

    #[test]
    fn ranges_print_inclusive() {
        assert_eq!(CoordRange { start: 3, end: 7 }.to_string(), "(3 - 7)");
    }
}
