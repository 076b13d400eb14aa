//! Completion detection for stamp boards.
//!
//! A board is complete when it has at least two members and all of them are
//! visited. Each board is celebrated at most once per detector lifetime:
//! once celebrated it stays celebrated even if a member is un-visited later.
//! Celebrations are shown one at a time, in the order boards completed.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use log::info;

use crate::types::stamp_board::{CompletionPhase, StampBoard};

/// How long one celebration stays on screen.
pub const CELEBRATION_DURATION: Duration = Duration::from_secs(4);

/// Smallest board that can complete.
pub const MIN_MEMBERS: usize = 2;

pub fn is_complete(board: &StampBoard) -> bool {
    board.bookmarks.len() >= MIN_MEMBERS && board.bookmarks.iter().all(|b| b.visited)
}

#[derive(Debug, Default)]
pub struct CompletionDetector {
    celebrated: HashSet<String>,
    pending: VecDeque<String>,
    current: Option<String>,
}

impl CompletionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every board and queues a celebration for each one that just
    /// completed for the first time. Returns the newly queued board ids.
    pub fn evaluate(&mut self, boards: &[StampBoard]) -> Vec<String> {
        let mut fired = Vec::new();
        for board in boards {
            if is_complete(board) && self.celebrated.insert(board.id.clone()) {
                info!("stamp board {} completed", board.id);
                self.pending.push_back(board.id.clone());
                fired.push(board.id.clone());
            }
        }
        if self.current.is_none() {
            self.current = self.pending.pop_front();
        }
        fired
    }

    /// `CompletePendingCelebration` covers a complete board that `evaluate`
    /// has not seen yet.
    pub fn phase(&self, board: &StampBoard) -> CompletionPhase {
        if self.celebrated.contains(&board.id) {
            CompletionPhase::Celebrated
        } else if is_complete(board) {
            CompletionPhase::CompletePendingCelebration
        } else {
            CompletionPhase::Incomplete
        }
    }

    pub fn has_celebrated(&self, board_id: &str) -> bool {
        self.celebrated.contains(board_id)
    }

    /// The celebration currently on screen.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn queued(&self) -> usize {
        self.pending.len()
    }

    /// Ends the current celebration and shows the next queued one, if any.
    pub fn finish_current(&mut self) -> Option<&str> {
        self.current = self.pending.pop_front();
        self.current.as_deref()
    }
}
