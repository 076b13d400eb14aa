//! REST client for the Stampbook backend.
//!
//! Every request carries `Authorization: Bearer <token>` when a token is
//! stored. A `401` clears the token through the session manager before the
//! error is returned. Failures never escape as anything but [`ApiError`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{AccountBackend, PostBackend, StampBackend};
use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::types::bookmark::{Bookmark, SavePlaceRequest};
use crate::types::errors::ApiError;
use crate::types::post::{CreatePostRequest, Post, UpdatePostRequest};
use crate::types::settings::ApiSettings;
use crate::types::stamp_board::StampBoard;
use crate::types::user::{LoginResponse, User};

/// reqwest-backed implementation of all backend traits.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl HttpBackend {
    pub fn new(settings: &ApiSettings, session: Arc<SessionManager>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.endpoint(path))
            .header(CONTENT_TYPE, "application/json");
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and returns the body of a successful response.
    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if let Err(e) = check_status(status, &body) {
            if e == ApiError::Unauthorized {
                self.session.handle_unauthorized();
            }
            return Err(e);
        }
        Ok(body)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(builder).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn fetch_message(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let body = self.send(builder).await?;
        Ok(parse_message(&body))
    }
}

/// Maps a response status to the error taxonomy. Success yields `Ok(())`.
pub fn check_status(status: StatusCode, body: &str) -> Result<(), ApiError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ApiError::Status {
            code: status.as_u16(),
            message: error_message(status.as_u16(), body),
        });
    }
    Ok(())
}

/// Extracts `message` from an error body, or falls back to `HTTP <code>`.
pub fn error_message(code: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", code))
}

/// Message-string responses arrive either JSON-encoded or as plain text.
pub fn parse_message(body: &str) -> String {
    match serde_json::from_str::<String>(body) {
        Ok(msg) => msg,
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl StampBackend for HttpBackend {
    async fn list_boards(&self) -> Result<Vec<StampBoard>, ApiError> {
        self.fetch_json(self.request(Method::GET, "/stampboards/me/boards"))
            .await
    }

    async fn list_bookmarks(&self, visited: Option<bool>) -> Result<Vec<Bookmark>, ApiError> {
        let mut builder = self.request(Method::GET, "/users/me/bookmarks");
        if let Some(v) = visited {
            builder = builder.query(&[("visited", v.to_string())]);
        }
        self.fetch_json(builder).await
    }

    async fn save_place(&self, request: &SavePlaceRequest) -> Result<String, ApiError> {
        let builder = self.request(Method::POST, "/users/search").query(&[
            ("placeName", request.place_name.clone()),
            ("address", request.address.clone()),
            ("latitude", request.latitude.to_string()),
            ("longitude", request.longitude.to_string()),
        ]);
        self.fetch_message(builder).await
    }

    async fn delete_bookmark(&self, bookmark_id: &str) -> Result<String, ApiError> {
        self.fetch_message(self.request(Method::DELETE, &format!("/users/{}", bookmark_id)))
            .await
    }

    async fn create_board(&self, title: &str, color: &str) -> Result<StampBoard, ApiError> {
        let builder = self
            .request(Method::POST, "/stampboards")
            .query(&[("title", title), ("color", color)]);
        self.fetch_json(builder).await
    }

    async fn rename_board(&self, board_id: &str, title: &str) -> Result<String, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("/stampboards/{}/title", board_id))
            .query(&[("title", title)]);
        self.fetch_message(builder).await
    }

    async fn recolor_board(&self, board_id: &str, color: &str) -> Result<String, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("/stampboards/{}/color", board_id))
            .query(&[("color", color)]);
        self.fetch_message(builder).await
    }

    async fn delete_board(&self, board_id: &str) -> Result<String, ApiError> {
        self.fetch_message(self.request(Method::DELETE, &format!("/stampboards/{}", board_id)))
            .await
    }

    async fn add_bookmark_to_board(
        &self,
        board_id: &str,
        bookmark_id: &str,
    ) -> Result<String, ApiError> {
        let builder = self
            .request(Method::POST, &format!("/stampboards/{}/bookmark", board_id))
            .body(bookmark_id.to_string());
        self.fetch_message(builder).await
    }

    async fn remove_bookmark_from_board(
        &self,
        board_id: &str,
        bookmark_id: &str,
    ) -> Result<String, ApiError> {
        let builder = self
            .request(Method::DELETE, &format!("/stampboards/{}/bookmark", board_id))
            .body(bookmark_id.to_string());
        self.fetch_message(builder).await
    }
}

#[async_trait]
impl PostBackend for HttpBackend {
    async fn all_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.fetch_json(self.request(Method::GET, "/posts/allPosts"))
            .await
    }

    async fn search_posts(&self, keyword: &str) -> Result<Vec<Post>, ApiError> {
        let builder = self
            .request(Method::GET, "/posts/search")
            .query(&[("keyword", keyword)]);
        self.fetch_json(builder).await
    }

    async fn create_post(&self, request: &CreatePostRequest) -> Result<String, ApiError> {
        self.fetch_message(self.request(Method::POST, "/posts/").json(request))
            .await
    }

    async fn update_post(
        &self,
        post_id: &str,
        request: &UpdatePostRequest,
    ) -> Result<String, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/posts/{}", post_id))
            .json(request);
        self.fetch_message(builder).await
    }

    async fn delete_post(&self, post_id: &str) -> Result<String, ApiError> {
        self.fetch_message(self.request(Method::DELETE, &format!("/posts/{}", post_id)))
            .await
    }
}

#[async_trait]
impl AccountBackend for HttpBackend {
    async fn me(&self) -> Result<User, ApiError> {
        self.fetch_json(self.request(Method::GET, "/users/me")).await
    }

    async fn update_nickname(&self, nickname: &str) -> Result<String, ApiError> {
        let builder = self
            .request(Method::PATCH, "/users/me")
            .json(&json!({ "nickname": nickname }));
        self.fetch_message(builder).await
    }

    async fn google_login(&self, id_token: &str) -> Result<LoginResponse, ApiError> {
        let builder = self
            .request(Method::POST, "/auth/google")
            .json(&json!({ "idToken": id_token }));
        self.fetch_json(builder).await
    }
}
