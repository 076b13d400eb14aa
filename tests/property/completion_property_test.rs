//! Property-based tests for the completion detector.
//!
//! Under any sequence of visited toggles, each board is celebrated at most
//! once, and a board is celebrated exactly when it has ever been complete.

use proptest::prelude::*;
use stampbook::services::completion::{is_complete, CompletionDetector};
use stampbook::types::bookmark::{Bookmark, OwnerRef};
use stampbook::types::stamp_board::StampBoard;

fn boards(sizes: &[usize]) -> Vec<StampBoard> {
    sizes
        .iter()
        .enumerate()
        .map(|(b, size)| StampBoard {
            id: b.to_string(),
            title: format!("board {}", b),
            color: "#153641".to_string(),
            created_at: String::new(),
            user: OwnerRef { id: "u".to_string() },
            bookmarks: (0..*size)
                .map(|m| Bookmark {
                    id: format!("{}-{}", b, m),
                    place_name: format!("place {}", m),
                    address: String::new(),
                    latitude: m as f64,
                    longitude: b as f64,
                    visited: false,
                    created_at: String::new(),
                    user: OwnerRef { id: "u".to_string() },
                    post: None,
                })
                .collect(),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn each_board_celebrates_at_most_once(
        sizes in prop::collection::vec(1usize..4, 1..5),
        toggles in prop::collection::vec((0usize..5, 0usize..4, any::<bool>()), 0..60),
    ) {
        let mut state = boards(&sizes);
        let mut detector = CompletionDetector::new();
        let mut fired: Vec<String> = Vec::new();
        let mut ever_complete = vec![false; state.len()];

        for (b, m, visited) in toggles {
            let b = b % state.len();
            let m = m % state[b].bookmarks.len();
            state[b].bookmarks[m].visited = visited;

            fired.extend(detector.evaluate(&state));
            for (i, board) in state.iter().enumerate() {
                ever_complete[i] |= is_complete(board);
            }
            while detector.current().is_some() {
                detector.finish_current();
            }
        }

        let mut unique = fired.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), fired.len(), "a board fired twice: {:?}", fired);

        for (i, board) in state.iter().enumerate() {
            prop_assert_eq!(detector.has_celebrated(&board.id), ever_complete[i]);
            if board.bookmarks.len() < 2 {
                prop_assert!(!detector.has_celebrated(&board.id));
            }
        }
    }
}
