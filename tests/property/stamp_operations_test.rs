//! Property-based tests for StampStore mutation sequences.
//!
//! For any sequence of board and membership operations, the flattened
//! bookmark list equals the concatenation of the boards' members, and no
//! board ever holds two bookmarks at the same place.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use stampbook::api::FakeBackend;
use stampbook::managers::stamp_store::StampStore;
use stampbook::types::bookmark::Bookmark;
use stampbook::types::stamp_board::StampData;

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    Delete(usize),
    Add(usize, usize),
    Remove(usize, usize),
    Toggle(usize, bool),
    Refresh,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[가-힣a-z]{1,6}".prop_map(Op::Create),
        (0usize..6).prop_map(Op::Delete),
        (0usize..6, 0usize..8).prop_map(|(b, m)| Op::Add(b, m)),
        (0usize..6, 0usize..8).prop_map(|(b, m)| Op::Remove(b, m)),
        (0usize..8, any::<bool>()).prop_map(|(m, v)| Op::Toggle(m, v)),
        Just(Op::Refresh),
    ]
}

fn pick<T: Clone>(items: &[T], index: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[index % items.len()].clone())
    }
}

async fn apply(store: &StampStore, op: &Op) {
    let data = store.snapshot();
    let board_ids: Vec<String> = data.stamp_boards.iter().map(|b| b.id.clone()).collect();
    let bookmark_ids: Vec<String> = store
        .saved_bookmarks(None)
        .iter()
        .map(|b| b.id.clone())
        .collect();

    // Failures are expected for duplicates; only the invariants matter here.
    match op {
        Op::Create(title) => {
            let _ = store.create_board(title, "#153641").await;
        }
        Op::Delete(b) => {
            if let Some(id) = pick(&board_ids, *b) {
                let _ = store.delete_board(&id).await;
            }
        }
        Op::Add(b, m) => {
            if let (Some(board), Some(bookmark)) = (pick(&board_ids, *b), pick(&bookmark_ids, *m)) {
                let _ = store.add_to_board(&board, &bookmark).await;
            }
        }
        Op::Remove(b, m) => {
            if let (Some(board), Some(bookmark)) = (pick(&board_ids, *b), pick(&bookmark_ids, *m)) {
                let _ = store.remove_from_board(&board, &bookmark).await;
            }
        }
        Op::Toggle(m, visited) => {
            if let Some(bookmark) = pick(&bookmark_ids, *m) {
                let _ = store.toggle_visited(&bookmark, *visited);
            }
        }
        Op::Refresh => {
            let _ = store.refresh().await;
        }
    }
}

fn check_invariants(data: &StampData) -> Result<(), TestCaseError> {
    let flattened: Vec<Bookmark> = data
        .stamp_boards
        .iter()
        .flat_map(|b| b.bookmarks.iter().cloned())
        .collect();
    prop_assert_eq!(&data.bookmarks, &flattened);

    for board in &data.stamp_boards {
        let mut seen = HashSet::new();
        for member in &board.bookmarks {
            prop_assert!(
                seen.insert(member.place_key()),
                "board {} holds {} twice",
                board.id,
                member.place_name
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn invariants_hold_after_any_operation_sequence(ops in prop::collection::vec(arb_op(), 1..25)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let store = StampStore::new(Arc::new(FakeBackend::new()));
            store.refresh().await.unwrap();
            for op in &ops {
                apply(&store, op).await;
                check_invariants(&store.snapshot())?;
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn visited_flag_is_consistent_across_copies(ops in prop::collection::vec(arb_op(), 1..25)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let store = StampStore::new(Arc::new(FakeBackend::new()));
            store.refresh().await.unwrap();
            for op in &ops {
                apply(&store, op).await;
            }
            let data = store.snapshot();
            for copy in &data.bookmarks {
                let canonical = store.bookmark(&copy.id);
                prop_assert_eq!(canonical.map(|b| b.visited), Some(copy.visited));
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
