//! Unit tests for board completion detection and the celebration queue.

use std::time::Duration;

use rstest::rstest;
use stampbook::services::completion::{is_complete, CompletionDetector, CELEBRATION_DURATION};
use stampbook::types::bookmark::{Bookmark, OwnerRef};
use stampbook::types::stamp_board::{CompletionPhase, StampBoard};

fn board(id: &str, visited: &[bool]) -> StampBoard {
    StampBoard {
        id: id.to_string(),
        title: id.to_string(),
        color: "#153641".to_string(),
        created_at: String::new(),
        user: OwnerRef { id: "u".to_string() },
        bookmarks: visited
            .iter()
            .enumerate()
            .map(|(i, v)| Bookmark {
                id: format!("{}-{}", id, i),
                place_name: format!("place {}", i),
                address: String::new(),
                latitude: 37.0 + i as f64,
                longitude: 127.0,
                visited: *v,
                created_at: String::new(),
                user: OwnerRef { id: "u".to_string() },
                post: None,
            })
            .collect(),
    }
}

#[rstest]
#[case(&[], false)]
#[case(&[true], false)]
#[case(&[false, false], false)]
#[case(&[true, false], false)]
#[case(&[true, true], true)]
#[case(&[true, true, true], true)]
fn test_is_complete(#[case] visited: &[bool], #[case] expected: bool) {
    assert_eq!(is_complete(&board("b", visited)), expected);
}

#[test]
fn test_celebration_lasts_four_seconds() {
    assert_eq!(CELEBRATION_DURATION, Duration::from_secs(4));
}

#[test]
fn test_completing_board_fires_once() {
    let mut detector = CompletionDetector::new();
    assert!(detector.evaluate(&[board("A", &[false, false])]).is_empty());
    assert!(detector.evaluate(&[board("A", &[true, false])]).is_empty());

    assert_eq!(detector.evaluate(&[board("A", &[true, true])]), vec!["A"]);
    assert_eq!(detector.current(), Some("A"));

    // un-visit and re-visit within the same session
    assert!(detector.evaluate(&[board("A", &[true, false])]).is_empty());
    assert!(detector.evaluate(&[board("A", &[true, true])]).is_empty());
}

#[test]
fn test_singleton_board_never_fires() {
    let mut detector = CompletionDetector::new();
    assert!(detector.evaluate(&[board("S", &[true])]).is_empty());
    assert_eq!(detector.current(), None);
    assert_eq!(detector.phase(&board("S", &[true])), CompletionPhase::Incomplete);
}

#[test]
fn test_phase_moves_forward_only() {
    let mut detector = CompletionDetector::new();
    let done = board("A", &[true, true]);
    assert_eq!(detector.phase(&board("A", &[false, true])), CompletionPhase::Incomplete);
    assert_eq!(detector.phase(&done), CompletionPhase::CompletePendingCelebration);

    detector.evaluate(&[done.clone()]);
    assert_eq!(detector.phase(&done), CompletionPhase::Celebrated);
    assert_eq!(
        detector.phase(&board("A", &[false, false])),
        CompletionPhase::Celebrated,
        "celebrated is terminal for the session"
    );
}

#[test]
fn test_simultaneous_completions_are_shown_one_at_a_time() {
    let mut detector = CompletionDetector::new();
    let fired = detector.evaluate(&[
        board("A", &[true, true]),
        board("B", &[false, true]),
        board("C", &[true, true, true]),
    ]);

    assert_eq!(fired, vec!["A", "C"]);
    assert_eq!(detector.current(), Some("A"));
    assert_eq!(detector.queued(), 1);
    assert_eq!(detector.finish_current(), Some("C"));
    assert_eq!(detector.finish_current(), None);
    assert_eq!(detector.current(), None);
}

#[test]
fn test_later_completion_waits_for_current() {
    let mut detector = CompletionDetector::new();
    detector.evaluate(&[board("A", &[true, true]), board("B", &[false, true])]);
    detector.evaluate(&[board("A", &[true, true]), board("B", &[true, true])]);

    assert_eq!(detector.current(), Some("A"));
    assert!(detector.has_celebrated("B"));
    assert_eq!(detector.finish_current(), Some("B"));
}

#[test]
fn test_celebrated_board_stays_celebrated_after_removal() {
    let mut detector = CompletionDetector::new();
    detector.evaluate(&[board("A", &[true, true])]);
    detector.finish_current();
    detector.evaluate(&[]);
    assert!(detector.evaluate(&[board("A", &[true, true])]).is_empty());
}
