//! In-memory simulated backend used in development mode.
//!
//! Seeded from [`super::fixtures`], it answers the same calls as the real
//! backend with the same status semantics (404 for unknown ids, 409 for
//! duplicates, 400 for empty required fields). Outages and per-operation
//! failures can be switched on to exercise error paths without a server.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use super::fixtures;
use super::{AccountBackend, PostBackend, StampBackend};
use crate::types::bookmark::{Bookmark, OwnerRef, SavePlaceRequest};
use crate::types::errors::ApiError;
use crate::types::post::{CreatePostRequest, Post, PostAuthor, UpdatePostRequest};
use crate::types::stamp_board::StampBoard;
use crate::types::user::{LoginResponse, User};

/// Operations that can be told to fail with a 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeOp {
    ListBoards,
    ListBookmarks,
    SavePlace,
    DeleteBookmark,
    CreateBoard,
    RenameBoard,
    RecolorBoard,
    DeleteBoard,
    AddMembership,
    RemoveMembership,
    ListPosts,
    WritePost,
    Account,
}

struct FakeState {
    boards: Vec<StampBoard>,
    bookmarks: Vec<Bookmark>,
    posts: Vec<Post>,
    user: User,
    next_id: u64,
    offline: bool,
    failing: HashSet<FakeOp>,
    calls: Vec<FakeOp>,
}

impl FakeState {
    fn issue_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn board_mut(&mut self, board_id: &str) -> Result<&mut StampBoard, ApiError> {
        self.boards
            .iter_mut()
            .find(|b| b.id == board_id)
            .ok_or_else(|| not_found("stamp board", board_id))
    }
}

fn not_found(what: &str, id: &str) -> ApiError {
    ApiError::Status {
        code: 404,
        message: format!("{} {} not found", what, id),
    }
}

fn bad_request(message: &str) -> ApiError {
    ApiError::Status {
        code: 400,
        message: message.to_string(),
    }
}

fn conflict(message: String) -> ApiError {
    ApiError::Status { code: 409, message }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Simulated backend holding the fixture dataset in memory.
pub struct FakeBackend {
    state: Mutex<FakeState>,
    latency: Duration,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    /// A backend seeded with the fixed development dataset.
    pub fn new() -> Self {
        Self::with_data(fixtures::stamp_boards(), fixtures::saved_bookmarks(), fixtures::posts())
    }

    /// A backend with no boards, bookmarks or posts.
    pub fn empty() -> Self {
        Self::with_data(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn with_data(boards: Vec<StampBoard>, bookmarks: Vec<Bookmark>, posts: Vec<Post>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                boards,
                bookmarks,
                posts,
                user: fixtures::user(),
                next_id: 1000,
                offline: false,
                failing: HashSet::new(),
                calls: Vec::new(),
            }),
            latency: Duration::ZERO,
        }
    }

    /// Adds a simulated round-trip delay to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// While offline every call fails as a network error.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.offline = offline;
        }
    }

    /// Makes `op` fail with a 500 until [`FakeBackend::recover`] is called.
    pub fn fail_on(&self, op: FakeOp) {
        if let Ok(mut state) = self.state.lock() {
            state.failing.insert(op);
        }
    }

    pub fn recover(&self, op: FakeOp) {
        if let Ok(mut state) = self.state.lock() {
            state.failing.remove(&op);
        }
    }

    /// Operations attempted so far, in call order.
    pub fn calls(&self) -> Vec<FakeOp> {
        self.state.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    /// Starts a call: waits out the latency, then checks outage switches.
    async fn enter(&self, op: FakeOp) -> Result<MutexGuard<'_, FakeState>, ApiError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let mut state = self
            .state
            .lock()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        state.calls.push(op);
        if state.offline {
            return Err(ApiError::Network("fake backend is offline".to_string()));
        }
        if state.failing.contains(&op) {
            return Err(ApiError::Status {
                code: 500,
                message: format!("simulated failure: {:?}", op),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl StampBackend for FakeBackend {
    async fn list_boards(&self) -> Result<Vec<StampBoard>, ApiError> {
        let state = self.enter(FakeOp::ListBoards).await?;
        Ok(state.boards.clone())
    }

    async fn list_bookmarks(&self, visited: Option<bool>) -> Result<Vec<Bookmark>, ApiError> {
        let state = self.enter(FakeOp::ListBookmarks).await?;
        Ok(state
            .bookmarks
            .iter()
            .filter(|b| visited.map_or(true, |v| b.visited == v))
            .cloned()
            .collect())
    }

    async fn save_place(&self, request: &SavePlaceRequest) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::SavePlace).await?;
        if request.place_name.trim().is_empty() {
            return Err(bad_request("placeName is required"));
        }
        let key = request.place_key();
        if state.bookmarks.iter().any(|b| b.place_key() == key) {
            return Err(conflict(format!("{} is already bookmarked", request.place_name)));
        }
        let id = state.issue_id();
        let owner = state.user.id.clone();
        state.bookmarks.push(Bookmark {
            id,
            place_name: request.place_name.clone(),
            address: request.address.clone(),
            latitude: request.latitude,
            longitude: request.longitude,
            visited: false,
            created_at: now_iso(),
            user: OwnerRef { id: owner },
            post: None,
        });
        Ok("북마크 추가 완료".to_string())
    }

    async fn delete_bookmark(&self, bookmark_id: &str) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::DeleteBookmark).await?;
        let before = state.bookmarks.len();
        state.bookmarks.retain(|b| b.id != bookmark_id);
        if state.bookmarks.len() == before {
            return Err(not_found("bookmark", bookmark_id));
        }
        for board in state.boards.iter_mut() {
            board.bookmarks.retain(|b| b.id != bookmark_id);
        }
        Ok("북마크 삭제 완료".to_string())
    }

    async fn create_board(&self, title: &str, color: &str) -> Result<StampBoard, ApiError> {
        let mut state = self.enter(FakeOp::CreateBoard).await?;
        if title.trim().is_empty() {
            return Err(bad_request("title is required"));
        }
        let id = state.issue_id();
        let board = StampBoard {
            id,
            title: title.to_string(),
            color: color.to_string(),
            created_at: now_iso(),
            user: OwnerRef {
                id: state.user.id.clone(),
            },
            bookmarks: Vec::new(),
        };
        state.boards.push(board.clone());
        Ok(board)
    }

    async fn rename_board(&self, board_id: &str, title: &str) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::RenameBoard).await?;
        if title.trim().is_empty() {
            return Err(bad_request("title is required"));
        }
        state.board_mut(board_id)?.title = title.to_string();
        Ok("스탬프보드 제목 수정 완료".to_string())
    }

    async fn recolor_board(&self, board_id: &str, color: &str) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::RecolorBoard).await?;
        state.board_mut(board_id)?.color = color.to_string();
        Ok("스탬프보드 색상 수정 완료".to_string())
    }

    async fn delete_board(&self, board_id: &str) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::DeleteBoard).await?;
        let before = state.boards.len();
        state.boards.retain(|b| b.id != board_id);
        if state.boards.len() == before {
            return Err(not_found("stamp board", board_id));
        }
        Ok("스탬프보드 삭제 완료".to_string())
    }

    async fn add_bookmark_to_board(
        &self,
        board_id: &str,
        bookmark_id: &str,
    ) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::AddMembership).await?;
        let bookmark = state
            .bookmarks
            .iter()
            .find(|b| b.id == bookmark_id)
            .cloned()
            .ok_or_else(|| not_found("bookmark", bookmark_id))?;
        let key = bookmark.place_key();
        let board = state.board_mut(board_id)?;
        if board.bookmarks.iter().any(|b| b.place_key() == key) {
            return Err(conflict(format!("{} is already in this board", bookmark.place_name)));
        }
        board.bookmarks.push(bookmark);
        Ok("스탬프보드에 북마크 추가 완료".to_string())
    }

    async fn remove_bookmark_from_board(
        &self,
        board_id: &str,
        bookmark_id: &str,
    ) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::RemoveMembership).await?;
        let board = state.board_mut(board_id)?;
        let before = board.bookmarks.len();
        board.bookmarks.retain(|b| b.id != bookmark_id);
        if board.bookmarks.len() == before {
            return Err(not_found("bookmark", bookmark_id));
        }
        Ok("스탬프보드에서 북마크 삭제 완료".to_string())
    }
}

#[async_trait]
impl PostBackend for FakeBackend {
    async fn all_posts(&self) -> Result<Vec<Post>, ApiError> {
        let state = self.enter(FakeOp::ListPosts).await?;
        Ok(state.posts.clone())
    }

    async fn search_posts(&self, keyword: &str) -> Result<Vec<Post>, ApiError> {
        let state = self.enter(FakeOp::ListPosts).await?;
        Ok(state
            .posts
            .iter()
            .filter(|p| {
                p.title.contains(keyword) || p.content.contains(keyword) || p.address.contains(keyword)
            })
            .cloned()
            .collect())
    }

    async fn create_post(&self, request: &CreatePostRequest) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::WritePost).await?;
        let id = state.issue_id();
        let author = PostAuthor {
            id: state.user.id.clone(),
            email: state.user.email.clone(),
        };
        state.posts.push(Post {
            id,
            title: request.title.clone(),
            content: request.content.clone(),
            address: request.address.clone(),
            latitude: request.latitude,
            longitude: request.longitude,
            user: Some(author),
        });
        Ok("게시글 작성 완료".to_string())
    }

    async fn update_post(
        &self,
        post_id: &str,
        request: &UpdatePostRequest,
    ) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::WritePost).await?;
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| not_found("post", post_id))?;
        if let Some(title) = &request.title {
            post.title = title.clone();
        }
        if let Some(content) = &request.content {
            post.content = content.clone();
        }
        if let Some(address) = &request.address {
            post.address = address.clone();
        }
        if let Some(latitude) = request.latitude {
            post.latitude = latitude;
        }
        if let Some(longitude) = request.longitude {
            post.longitude = longitude;
        }
        Ok("게시글 수정 완료".to_string())
    }

    async fn delete_post(&self, post_id: &str) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::WritePost).await?;
        let before = state.posts.len();
        state.posts.retain(|p| p.id != post_id);
        if state.posts.len() == before {
            return Err(not_found("post", post_id));
        }
        Ok("게시글 삭제 완료".to_string())
    }
}

#[async_trait]
impl AccountBackend for FakeBackend {
    async fn me(&self) -> Result<User, ApiError> {
        let state = self.enter(FakeOp::Account).await?;
        Ok(state.user.clone())
    }

    async fn update_nickname(&self, nickname: &str) -> Result<String, ApiError> {
        let mut state = self.enter(FakeOp::Account).await?;
        if nickname.trim().is_empty() {
            return Err(bad_request("nickname is required"));
        }
        state.user.nickname = Some(nickname.to_string());
        Ok("닉네임 변경 완료".to_string())
    }

    async fn google_login(&self, id_token: &str) -> Result<LoginResponse, ApiError> {
        let mut state = self.enter(FakeOp::Account).await?;
        if id_token.trim().is_empty() {
            return Err(bad_request("idToken is required"));
        }
        let token = format!("test-token-{}", state.issue_id());
        Ok(LoginResponse {
            access_token: token,
            user: state.user.clone(),
        })
    }
}
