//! Stamp Store for Stampbook.
//!
//! Holds the session copy of the user's stamp boards and saved bookmarks and
//! mediates every mutation through the backend. State is normalized: each
//! bookmark lives once in a library keyed by id and boards hold member ids,
//! so a visited flag has exactly one home and the flattened bookmark list
//! in [`StampData`] is always derived, never stored.
//!
//! Mutations to one board are serialized through that board's queue and
//! hold it across their network round-trip. The state lock itself is only
//! taken between awaits, so dropping an in-flight future leaves state as it
//! was.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};
use tokio::sync::{Mutex as QueueLock, OwnedMutexGuard};

use crate::api::StampBackend;
use crate::types::bookmark::{Bookmark, OwnerRef, SavePlaceRequest};
use crate::types::errors::{ApiError, StoreError};
use crate::types::stamp_board::{BoardUpdate, StampBoard, StampData};

/// Where the data of the last successful refresh came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSource {
    Backend,
    /// Development mode only: the primary backend failed and the simulated
    /// backend answered instead.
    Fallback,
}

/// A board with membership held as bookmark ids.
#[derive(Debug, Clone)]
struct BoardRecord {
    id: String,
    title: String,
    color: String,
    created_at: String,
    user: OwnerRef,
    members: Vec<String>,
}

impl BoardRecord {
    fn from_board(board: &StampBoard) -> Self {
        let mut members: Vec<String> = Vec::with_capacity(board.bookmarks.len());
        for b in &board.bookmarks {
            if !members.contains(&b.id) {
                members.push(b.id.clone());
            }
        }
        Self {
            id: board.id.clone(),
            title: board.title.clone(),
            color: board.color.clone(),
            created_at: board.created_at.clone(),
            user: board.user.clone(),
            members,
        }
    }
}

#[derive(Default)]
struct StampState {
    boards: Vec<BoardRecord>,
    library: HashMap<String, Bookmark>,
    library_order: Vec<String>,
    source: Option<RefreshSource>,
    last_error: Option<String>,
}

impl StampState {
    fn loaded(boards: Vec<StampBoard>, saved: Vec<Bookmark>, source: RefreshSource) -> Self {
        let mut state = StampState {
            source: Some(source),
            ..Default::default()
        };
        state.merge_library(saved);
        for board in &boards {
            for b in &board.bookmarks {
                if !state.library.contains_key(&b.id) {
                    state.library_order.push(b.id.clone());
                    state.library.insert(b.id.clone(), b.clone());
                }
            }
        }
        state.boards = boards.iter().map(BoardRecord::from_board).collect();
        state
    }

    /// Saved bookmarks replace existing entries with the same id; new ones are appended.
    fn merge_library(&mut self, saved: Vec<Bookmark>) {
        for b in saved {
            if !self.library.contains_key(&b.id) {
                self.library_order.push(b.id.clone());
            }
            self.library.insert(b.id.clone(), b);
        }
    }

    fn board(&self, id: &str) -> Option<&BoardRecord> {
        self.boards.iter().find(|b| b.id == id)
    }

    fn board_mut(&mut self, id: &str) -> Option<&mut BoardRecord> {
        self.boards.iter_mut().find(|b| b.id == id)
    }

    fn materialize(&self, record: &BoardRecord) -> StampBoard {
        StampBoard {
            id: record.id.clone(),
            title: record.title.clone(),
            color: record.color.clone(),
            created_at: record.created_at.clone(),
            user: record.user.clone(),
            bookmarks: record
                .members
                .iter()
                .filter_map(|id| self.library.get(id).cloned())
                .collect(),
        }
    }

    /// Applies a membership the backend has already accepted. The board or
    /// the library may have changed while the request was in flight.
    fn record_added(&mut self, board_id: &str, bookmark_id: &str) -> Result<(), StoreError> {
        let record = match self.board(board_id) {
            Some(record) => record,
            None => {
                warn!("board {} vanished while adding {}", board_id, bookmark_id);
                return Err(StoreError::NotFound(board_id.to_string()));
            }
        };
        let bookmark = match self.library.get(bookmark_id) {
            Some(bookmark) => bookmark,
            None => {
                warn!("bookmark {} vanished while adding to {}", bookmark_id, board_id);
                return Err(StoreError::NotFound(bookmark_id.to_string()));
            }
        };
        if record.members.iter().any(|m| m == bookmark_id) {
            return Ok(());
        }
        if self.duplicate_in_board(record, bookmark) {
            warn!(
                "board {} gained {} from elsewhere during the request",
                board_id, bookmark.place_name
            );
            return Err(StoreError::DuplicatePlace(bookmark.place_name.clone()));
        }
        if let Some(record) = self.board_mut(board_id) {
            record.members.push(bookmark_id.to_string());
        }
        Ok(())
    }

    /// True when some member of `record` sits at the same place as `bookmark`.
    fn duplicate_in_board(&self, record: &BoardRecord, bookmark: &Bookmark) -> bool {
        let key = bookmark.place_key();
        record
            .members
            .iter()
            .filter_map(|id| self.library.get(id))
            .any(|m| m.place_key() == key)
    }
}

/// Client-side store for stamp boards and saved bookmarks.
pub struct StampStore {
    primary: Arc<dyn StampBackend>,
    fallback: Option<Arc<dyn StampBackend>>,
    state: Mutex<StampState>,
    queues: Mutex<HashMap<String, Arc<QueueLock<()>>>>,
}

impl StampStore {
    /// A store that reports backend failures as errors.
    pub fn new(primary: Arc<dyn StampBackend>) -> Self {
        Self {
            primary,
            fallback: None,
            state: Mutex::new(StampState::default()),
            queues: Mutex::new(HashMap::new()),
        }
    }

    /// Development mode: when the primary backend fails to load, serve data
    /// from `fallback` instead of surfacing an empty store.
    pub fn with_dev_fallback(mut self, fallback: Arc<dyn StampBackend>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn has_dev_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn state(&self) -> MutexGuard<'_, StampState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Backend that answered the last refresh.
    fn active(&self) -> Arc<dyn StampBackend> {
        match (self.state().source, &self.fallback) {
            (Some(RefreshSource::Fallback), Some(fallback)) => Arc::clone(fallback),
            _ => Arc::clone(&self.primary),
        }
    }

    /// Waits for this board's turn. The guard must be held across the round-trip.
    async fn enter_board(&self, board_id: &str) -> OwnedMutexGuard<()> {
        let queue = {
            let mut queues = self
                .queues
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(queues.entry(board_id.to_string()).or_default())
        };
        queue.lock_owned().await
    }

    /// Drops queues of boards outside `live` that nobody holds or waits on.
    fn prune_queues<F>(&self, live: F)
    where
        F: Fn(&str) -> bool,
    {
        self.queues
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|id, queue| live(id.as_str()) || Arc::strong_count(queue) > 1);
    }

    /// Records the outcome as the visible error state.
    fn settle<T>(&self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        let mut state = self.state();
        match &result {
            Ok(_) => state.last_error = None,
            Err(e) => {
                warn!("stamp store: {}", e);
                state.last_error = Some(e.to_string());
            }
        }
        result
    }

    async fn fetch_all(
        backend: &dyn StampBackend,
    ) -> Result<(Vec<StampBoard>, Vec<Bookmark>), ApiError> {
        let boards = backend.list_boards().await?;
        let saved = backend.list_bookmarks(None).await?;
        Ok((boards, saved))
    }

    /// Reloads boards and the bookmark library from the backend.
    ///
    /// The primary backend is always tried first. On failure a store built
    /// with a development fallback loads the fallback's data instead and
    /// returns [`RefreshSource::Fallback`]; otherwise local state is cleared
    /// and [`StoreError::Unavailable`] is returned.
    pub async fn refresh(&self) -> Result<RefreshSource, StoreError> {
        let result = self.refresh_inner().await;
        let live: Vec<String> = self.state().boards.iter().map(|b| b.id.clone()).collect();
        self.prune_queues(|id| live.iter().any(|b| b == id));
        result
    }

    async fn refresh_inner(&self) -> Result<RefreshSource, StoreError> {
        let primary_err = match Self::fetch_all(self.primary.as_ref()).await {
            Ok((boards, saved)) => {
                info!("loaded {} stamp boards from backend", boards.len());
                *self.state() = StampState::loaded(boards, saved, RefreshSource::Backend);
                return self.settle(Ok(RefreshSource::Backend));
            }
            Err(e) => e,
        };

        let result = match &self.fallback {
            Some(fallback) => {
                warn!(
                    "backend unavailable ({}), using development dataset",
                    primary_err
                );
                match Self::fetch_all(fallback.as_ref()).await {
                    Ok((boards, saved)) => {
                        *self.state() = StampState::loaded(boards, saved, RefreshSource::Fallback);
                        Ok(RefreshSource::Fallback)
                    }
                    Err(e) => {
                        *self.state() = StampState::default();
                        Err(StoreError::Unavailable(e.to_string()))
                    }
                }
            }
            None => {
                *self.state() = StampState::default();
                Err(StoreError::Unavailable(primary_err.to_string()))
            }
        };
        self.settle(result)
    }

    /// Creates an empty board and appends it.
    pub async fn create_board(&self, title: &str, color: &str) -> Result<StampBoard, StoreError> {
        let result = self.create_board_inner(title, color).await;
        self.settle(result)
    }

    async fn create_board_inner(&self, title: &str, color: &str) -> Result<StampBoard, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation("board title is empty".to_string()));
        }
        let mut created = self.active().create_board(title, color).await?;
        created.bookmarks.clear();
        self.state().boards.push(BoardRecord::from_board(&created));
        info!("created stamp board {}", created.id);
        Ok(created)
    }

    /// Applies a title and/or colour change.
    ///
    /// The two fields use independent calls. A field whose call succeeded
    /// stays applied even when the other one fails, and the result is then
    /// the first failure.
    pub async fn update_board(&self, board_id: &str, update: &BoardUpdate) -> Result<(), StoreError> {
        let result = self.update_board_inner(board_id, update).await;
        self.settle(result)
    }

    async fn update_board_inner(&self, board_id: &str, update: &BoardUpdate) -> Result<(), StoreError> {
        let title = match &update.title {
            Some(t) if t.trim().is_empty() => {
                return Err(StoreError::Validation("board title is empty".to_string()))
            }
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };
        if self.state().board(board_id).is_none() {
            return Err(StoreError::NotFound(board_id.to_string()));
        }
        if update.is_empty() {
            return Ok(());
        }

        let _turn = self.enter_board(board_id).await;
        let backend = self.active();
        let mut first_err: Option<StoreError> = None;

        if let Some(title) = title {
            match backend.rename_board(board_id, &title).await {
                Ok(_) => {
                    if let Some(record) = self.state().board_mut(board_id) {
                        record.title = title;
                    }
                }
                Err(e) => first_err = Some(e.into()),
            }
        }
        if let Some(color) = &update.color {
            match backend.recolor_board(board_id, color).await {
                Ok(_) => {
                    if let Some(record) = self.state().board_mut(board_id) {
                        record.color = color.clone();
                    }
                }
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(e.into());
                    }
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Deletes a board. Its bookmarks stay in the library.
    pub async fn delete_board(&self, board_id: &str) -> Result<(), StoreError> {
        let result = self.delete_board_inner(board_id).await;
        self.settle(result)
    }

    async fn delete_board_inner(&self, board_id: &str) -> Result<(), StoreError> {
        if self.state().board(board_id).is_none() {
            return Err(StoreError::NotFound(board_id.to_string()));
        }
        let turn = self.enter_board(board_id).await;
        self.active().delete_board(board_id).await?;
        self.state().boards.retain(|b| b.id != board_id);
        drop(turn);
        self.prune_queues(|id| id != board_id);
        info!("deleted stamp board {}", board_id);
        Ok(())
    }

    /// Sets the visited flag of one bookmark. Every board that holds it
    /// reflects the change in the same transition.
    ///
    /// Local only: the backend has no endpoint for it.
    pub fn toggle_visited(&self, bookmark_id: &str, visited: bool) -> Result<(), StoreError> {
        let result = match self.state().library.get_mut(bookmark_id) {
            Some(bookmark) => {
                bookmark.visited = visited;
                Ok(())
            }
            None => Err(StoreError::NotFound(bookmark_id.to_string())),
        };
        debug!("visited {} = {}", bookmark_id, visited);
        self.settle(result)
    }

    /// Adds a saved bookmark to a board unless its place is already there.
    pub async fn add_to_board(&self, board_id: &str, bookmark_id: &str) -> Result<(), StoreError> {
        let result = self.add_to_board_inner(board_id, bookmark_id).await;
        self.settle(result)
    }

    async fn add_to_board_inner(&self, board_id: &str, bookmark_id: &str) -> Result<(), StoreError> {
        let _turn = self.enter_board(board_id).await;
        self.check_addable(board_id, bookmark_id)?;

        self.active().add_bookmark_to_board(board_id, bookmark_id).await?;
        self.state().record_added(board_id, bookmark_id)
    }

    fn check_addable(&self, board_id: &str, bookmark_id: &str) -> Result<(), StoreError> {
        let state = self.state();
        let record = state
            .board(board_id)
            .ok_or_else(|| StoreError::NotFound(board_id.to_string()))?;
        let bookmark = state
            .library
            .get(bookmark_id)
            .ok_or_else(|| StoreError::NotFound(bookmark_id.to_string()))?;
        if state.duplicate_in_board(record, bookmark) {
            return Err(StoreError::DuplicatePlace(bookmark.place_name.clone()));
        }
        Ok(())
    }

    /// Removes a bookmark from one board. It stays saved.
    pub async fn remove_from_board(&self, board_id: &str, bookmark_id: &str) -> Result<(), StoreError> {
        let result = self.remove_from_board_inner(board_id, bookmark_id).await;
        self.settle(result)
    }

    async fn remove_from_board_inner(
        &self,
        board_id: &str,
        bookmark_id: &str,
    ) -> Result<(), StoreError> {
        let _turn = self.enter_board(board_id).await;
        {
            let state = self.state();
            let record = state
                .board(board_id)
                .ok_or_else(|| StoreError::NotFound(board_id.to_string()))?;
            if !record.members.iter().any(|m| m == bookmark_id) {
                return Err(StoreError::NotFound(bookmark_id.to_string()));
            }
        }

        self.active()
            .remove_bookmark_from_board(board_id, bookmark_id)
            .await?;

        if let Some(record) = self.state().board_mut(board_id) {
            record.members.retain(|m| m != bookmark_id);
        }
        Ok(())
    }

    /// Bookmarks a place found through search and returns the saved bookmark.
    pub async fn save_place(&self, request: &SavePlaceRequest) -> Result<Bookmark, StoreError> {
        let result = self.save_place_inner(request).await;
        self.settle(result)
    }

    async fn save_place_inner(&self, request: &SavePlaceRequest) -> Result<Bookmark, StoreError> {
        if request.place_name.trim().is_empty() {
            return Err(StoreError::Validation("place name is empty".to_string()));
        }
        let key = request.place_key();
        if self.state().library.values().any(|b| b.place_key() == key) {
            return Err(StoreError::DuplicatePlace(request.place_name.clone()));
        }

        let backend = self.active();
        backend.save_place(request).await?;
        let saved = backend.list_bookmarks(None).await?;

        let mut state = self.state();
        state.merge_library(saved);
        let found = state
            .library_order
            .iter()
            .filter_map(|id| state.library.get(id))
            .find(|b| b.place_key() == key)
            .cloned();
        found.ok_or_else(|| StoreError::NotFound(request.place_name.clone()))
    }

    /// Deletes a saved bookmark and drops it from every board.
    pub async fn remove_bookmark(&self, bookmark_id: &str) -> Result<(), StoreError> {
        let result = self.remove_bookmark_inner(bookmark_id).await;
        self.settle(result)
    }

    async fn remove_bookmark_inner(&self, bookmark_id: &str) -> Result<(), StoreError> {
        if !self.state().library.contains_key(bookmark_id) {
            return Err(StoreError::NotFound(bookmark_id.to_string()));
        }
        self.active().delete_bookmark(bookmark_id).await?;

        let mut state = self.state();
        state.library.remove(bookmark_id);
        state.library_order.retain(|id| id != bookmark_id);
        for record in state.boards.iter_mut() {
            record.members.retain(|m| m != bookmark_id);
        }
        Ok(())
    }

    /// Saved bookmarks in library order, optionally filtered by visited flag.
    pub fn saved_bookmarks(&self, visited: Option<bool>) -> Vec<Bookmark> {
        let state = self.state();
        state
            .library_order
            .iter()
            .filter_map(|id| state.library.get(id))
            .filter(|b| visited.map_or(true, |v| b.visited == v))
            .cloned()
            .collect()
    }

    pub fn bookmark(&self, bookmark_id: &str) -> Option<Bookmark> {
        self.state().library.get(bookmark_id).cloned()
    }

    pub fn board(&self, board_id: &str) -> Option<StampBoard> {
        let state = self.state();
        state.board(board_id).map(|r| state.materialize(r))
    }

    /// Current boards with the derived flattened bookmark list.
    pub fn snapshot(&self) -> StampData {
        let state = self.state();
        StampData::from_boards(state.boards.iter().map(|r| state.materialize(r)).collect())
    }

    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    pub fn source(&self) -> Option<RefreshSource> {
        self.state().source
    }

    /// Drops all data, e.g. on logout.
    pub fn clear(&self) {
        *self.state() = StampState::default();
        self.queues
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}
