//! Membership resolution: which boards already hold a given place.
//!
//! Pure functions over a [`StampData`] snapshot and the saved-bookmark
//! library. Places are matched by [`PlaceKey`], so coordinates must be
//! exactly equal.

use serde::Serialize;

use crate::types::bookmark::{Bookmark, PlaceKey};
use crate::types::stamp_board::{StampBoard, StampData};

pub fn is_in_board(board: &StampBoard, key: &PlaceKey) -> bool {
    board.bookmarks.iter().any(|b| &b.place_key() == key)
}

/// Ids of the boards containing `key`, in board order.
pub fn boards_containing(boards: &[StampBoard], key: &PlaceKey) -> Vec<String> {
    boards
        .iter()
        .filter(|b| is_in_board(b, key))
        .map(|b| b.id.clone())
        .collect()
}

/// One row of the "add to board" list in the place detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardMembership {
    pub board_id: String,
    pub title: String,
    pub color: String,
    pub contains: bool,
}

/// View model for a selected place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetail {
    pub key: PlaceKey,
    pub address: Option<String>,
    /// Saved bookmark id for this place, if it is saved at all.
    pub bookmark_id: Option<String>,
    pub visited: bool,
    pub boards: Vec<BoardMembership>,
}

impl PlaceDetail {
    /// Builds the detail for `key`. Address and bookmark id come from the
    /// first matching bookmark in board order, then in `saved` order, so a
    /// place that sits in no board still resolves to its library entry.
    pub fn resolve(data: &StampData, saved: &[Bookmark], key: &PlaceKey) -> Self {
        let mut copies = data
            .bookmarks
            .iter()
            .chain(saved.iter())
            .filter(|b| &b.place_key() == key);
        let first = copies.next();
        let visited = first.map_or(false, |b| b.visited) || copies.any(|b| b.visited);
        PlaceDetail {
            key: key.clone(),
            address: first.map(|b| b.address.clone()),
            bookmark_id: first.map(|b| b.id.clone()),
            visited,
            boards: data
                .stamp_boards
                .iter()
                .map(|board| BoardMembership {
                    board_id: board.id.clone(),
                    title: board.title.clone(),
                    color: board.color.clone(),
                    contains: is_in_board(board, key),
                })
                .collect(),
        }
    }

    pub fn member_board_ids(&self) -> Vec<&str> {
        self.boards
            .iter()
            .filter(|m| m.contains)
            .map(|m| m.board_id.as_str())
            .collect()
    }
}
