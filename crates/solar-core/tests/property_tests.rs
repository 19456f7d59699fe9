//! # Property-Based Tests
//!
//! Invariants of the usage tracker and the SSE decoder, checked with proptest.

use proptest::collection::vec;
use proptest::prelude::*;
use solar_core::{SseDecoder, SseEvent, Usage, UsageStats, UsageTracker};

// =============================================================================
// HELPERS
// =============================================================================

fn chunk_line(index: usize) -> String {
    format!(
        "data: {{\"id\":\"c{index}\",\"choices\":[{{\"index\":0,\"delta\":{{\"content\":\"tok{index}\"}}}}]}}\n"
    )
}

fn collect_contents(events: Vec<SseEvent>) -> Vec<String> {
    events
        .into_iter()
        .filter_map(|e| match e {
            SseEvent::Chunk(c) => c.content().map(str::to_string),
            SseEvent::Done => None,
        })
        .collect()
}

/// Feed `body` to a fresh decoder, cutting it at the given (sorted) offsets.
fn decode_in_pieces(body: &[u8], cuts: &[usize]) -> Vec<String> {
    let mut decoder = SseDecoder::new();
    let mut out = Vec::new();
    let mut start = 0;
    for &cut in cuts {
        let cut = cut.min(body.len()).max(start);
        out.extend(collect_contents(decoder.push(&body[start..cut])));
        start = cut;
    }
    out.extend(collect_contents(decoder.push(&body[start..])));
    out
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// total_tokens is always prompt + completion, request_count the number of calls.
    #[test]
    fn tracker_totals_are_consistent(
        usages in vec((0u64..1_000_000, 0u64..1_000_000), 0..50)
    ) {
        let tracker = UsageTracker::new();
        for &(prompt, completion) in &usages {
            tracker.add_usage(&Usage::new(prompt, completion));
        }

        let stats = tracker.stats();
        let expected_prompt: u64 = usages.iter().map(|u| u.0).sum();
        let expected_completion: u64 = usages.iter().map(|u| u.1).sum();

        prop_assert_eq!(stats.total_prompt_tokens, expected_prompt);
        prop_assert_eq!(stats.total_completion_tokens, expected_completion);
        prop_assert_eq!(stats.total_tokens, stats.total_prompt_tokens + stats.total_completion_tokens);
        prop_assert_eq!(stats.request_count, usages.len() as u64);
    }

    /// reset always lands on the all-zero state.
    #[test]
    fn tracker_reset_always_zeroes(
        usages in vec((0u64..1_000_000, 0u64..1_000_000), 0..20)
    ) {
        let tracker = UsageTracker::new();
        for &(prompt, completion) in &usages {
            tracker.add_usage(&Usage::new(prompt, completion));
        }
        tracker.reset();

        prop_assert_eq!(tracker.stats(), UsageStats::default());
    }

    /// The decoder yields the same chunks however the body is cut into reads.
    #[test]
    fn decoder_is_independent_of_read_boundaries(
        count in 1usize..12,
        mut cuts in vec(0usize..2000, 0..16)
    ) {
        let mut body = String::new();
        for i in 0..count {
            body.push_str(&chunk_line(i));
        }
        body.push_str("data: [DONE]\n");
        cuts.sort_unstable();

        let expected: Vec<String> = (0..count).map(|i| format!("tok{i}")).collect();
        prop_assert_eq!(decode_in_pieces(body.as_bytes(), &cuts), expected);
    }

    /// Malformed lines never hide the valid lines around them.
    #[test]
    fn malformed_lines_are_dropped_in_place(
        pattern in vec(any::<bool>(), 1..20)
    ) {
        let mut body = String::new();
        let mut expected = Vec::new();
        for (i, valid) in pattern.iter().enumerate() {
            if *valid {
                body.push_str(&chunk_line(i));
                expected.push(format!("tok{i}"));
            } else {
                body.push_str("data: {broken\n");
            }
        }

        let mut decoder = SseDecoder::new();
        prop_assert_eq!(collect_contents(decoder.push(body.as_bytes())), expected);
        prop_assert!(!decoder.is_finished());
    }
}
