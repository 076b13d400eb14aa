use serde::{Deserialize, Serialize};

use super::bookmark::{Bookmark, OwnerRef};
use super::ids;

/// Board colours offered when creating or recolouring a stamp board.
pub const COLOR_PALETTE: [&str; 10] = [
    "#153641", "#22556e", "#4799b7", "#6db3bf", "#94cfc9", "#e26d5c", "#f4a259", "#f7d08a",
    "#8cb369", "#5b8e7d",
];

/// A named, coloured collection of bookmarks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StampBoard {
    #[serde(deserialize_with = "ids::flexible_id")]
    pub id: String,
    pub title: String,
    pub color: String,
    #[serde(default)]
    pub created_at: String,
    pub user: OwnerRef,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

impl StampBoard {
    pub fn owner_id(&self) -> &str {
        &self.user.id
    }

    pub fn visited_count(&self) -> usize {
        self.bookmarks.iter().filter(|b| b.visited).count()
    }
}

/// Client-side aggregate of the user's boards.
///
/// `bookmarks` is the concatenation of every board's `bookmarks` in board
/// order. A bookmark that sits in two boards appears twice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StampData {
    pub stamp_boards: Vec<StampBoard>,
    pub bookmarks: Vec<Bookmark>,
}

impl StampData {
    /// Builds the aggregate, deriving the flattened bookmark list.
    pub fn from_boards(stamp_boards: Vec<StampBoard>) -> Self {
        let bookmarks = stamp_boards
            .iter()
            .flat_map(|b| b.bookmarks.iter().cloned())
            .collect();
        Self {
            stamp_boards,
            bookmarks,
        }
    }

    pub fn board(&self, id: &str) -> Option<&StampBoard> {
        self.stamp_boards.iter().find(|b| b.id == id)
    }
}

/// Partial edit of a board. Each field maps to its own backend endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BoardUpdate {
    pub title: Option<String>,
    pub color: Option<String>,
}

impl BoardUpdate {
    pub fn title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            color: None,
        }
    }

    pub fn color(color: &str) -> Self {
        Self {
            title: None,
            color: Some(color.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.color.is_none()
    }
}

/// Per-board completion lifecycle within one application session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionPhase {
    Incomplete,
    CompletePendingCelebration,
    Celebrated,
}
