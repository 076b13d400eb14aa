//! Backend access for Stampbook.
//!
//! The REST backend is the source of truth for boards, bookmarks, posts and
//! the user account. Each resource family sits behind its own async trait so
//! the stores can run against [`HttpBackend`] or, in development, the
//! in-memory [`FakeBackend`].

use async_trait::async_trait;

use crate::types::bookmark::{Bookmark, SavePlaceRequest};
use crate::types::errors::ApiError;
use crate::types::post::{CreatePostRequest, Post, UpdatePostRequest};
use crate::types::stamp_board::StampBoard;
use crate::types::user::{LoginResponse, User};

pub mod client;
pub mod fake;
pub mod fixtures;

pub use client::HttpBackend;
pub use fake::FakeBackend;

/// Stamp boards and the bookmarks they collect.
///
/// Mutations that the backend acknowledges with a message string return it as `String`.
#[async_trait]
pub trait StampBackend: Send + Sync {
    /// `GET /stampboards/me/boards`, each board with its member bookmarks.
    async fn list_boards(&self) -> Result<Vec<StampBoard>, ApiError>;
    /// `GET /users/me/bookmarks?visited=`
    async fn list_bookmarks(&self, visited: Option<bool>) -> Result<Vec<Bookmark>, ApiError>;
    /// `POST /users/search?placeName=&address=&latitude=&longitude=`
    async fn save_place(&self, request: &SavePlaceRequest) -> Result<String, ApiError>;
    /// `DELETE /users/{bookmarkId}`
    async fn delete_bookmark(&self, bookmark_id: &str) -> Result<String, ApiError>;
    /// `POST /stampboards?title=&color=`
    async fn create_board(&self, title: &str, color: &str) -> Result<StampBoard, ApiError>;
    /// `PATCH /stampboards/{id}/title?title=`
    async fn rename_board(&self, board_id: &str, title: &str) -> Result<String, ApiError>;
    /// `PATCH /stampboards/{id}/color?color=`
    async fn recolor_board(&self, board_id: &str, color: &str) -> Result<String, ApiError>;
    /// `DELETE /stampboards/{id}`
    async fn delete_board(&self, board_id: &str) -> Result<String, ApiError>;
    /// `POST /stampboards/{boardId}/bookmark` with the raw bookmark id as body.
    async fn add_bookmark_to_board(&self, board_id: &str, bookmark_id: &str)
        -> Result<String, ApiError>;
    /// `DELETE /stampboards/{boardId}/bookmark` with the raw bookmark id as body.
    async fn remove_bookmark_from_board(
        &self,
        board_id: &str,
        bookmark_id: &str,
    ) -> Result<String, ApiError>;
}

/// Location-tagged posts.
#[async_trait]
pub trait PostBackend: Send + Sync {
    async fn all_posts(&self) -> Result<Vec<Post>, ApiError>;
    async fn search_posts(&self, keyword: &str) -> Result<Vec<Post>, ApiError>;
    async fn create_post(&self, request: &CreatePostRequest) -> Result<String, ApiError>;
    async fn update_post(&self, post_id: &str, request: &UpdatePostRequest)
        -> Result<String, ApiError>;
    async fn delete_post(&self, post_id: &str) -> Result<String, ApiError>;
}

/// The signed-in account and the identity-token exchange.
#[async_trait]
pub trait AccountBackend: Send + Sync {
    async fn me(&self) -> Result<User, ApiError>;
    async fn update_nickname(&self, nickname: &str) -> Result<String, ApiError>;
    async fn google_login(&self, id_token: &str) -> Result<LoginResponse, ApiError>;
}
