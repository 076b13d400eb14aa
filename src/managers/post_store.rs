//! Post Store for Stampbook.
//!
//! Keeps the list of location-tagged posts shown on the map and in search.
//! Every successful mutation reloads the list from the backend.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{info, warn};

use crate::api::PostBackend;
use crate::managers::stamp_store::RefreshSource;
use crate::types::errors::{ApiError, StoreError};
use crate::types::post::{CreatePostRequest, Post, UpdatePostRequest};

#[derive(Default)]
struct PostState {
    posts: Vec<Post>,
    source: Option<RefreshSource>,
    last_error: Option<String>,
}

pub struct PostStore {
    primary: Arc<dyn PostBackend>,
    fallback: Option<Arc<dyn PostBackend>>,
    state: Mutex<PostState>,
}

impl PostStore {
    pub fn new(primary: Arc<dyn PostBackend>) -> Self {
        Self {
            primary,
            fallback: None,
            state: Mutex::new(PostState::default()),
        }
    }

    /// Development mode: serve posts from `fallback` when the primary fails to load.
    pub fn with_dev_fallback(mut self, fallback: Arc<dyn PostBackend>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn state(&self) -> MutexGuard<'_, PostState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn active(&self) -> Arc<dyn PostBackend> {
        match (self.state().source, &self.fallback) {
            (Some(RefreshSource::Fallback), Some(fallback)) => Arc::clone(fallback),
            _ => Arc::clone(&self.primary),
        }
    }

    fn settle<T>(&self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        let mut state = self.state();
        match &result {
            Ok(_) => state.last_error = None,
            Err(e) => {
                warn!("post store: {}", e);
                state.last_error = Some(e.to_string());
            }
        }
        result
    }

    /// Reloads every post, with the same fallback policy as the stamp store.
    pub async fn refresh(&self) -> Result<RefreshSource, StoreError> {
        let primary_err: ApiError = match self.primary.all_posts().await {
            Ok(posts) => {
                info!("loaded {} posts", posts.len());
                let mut state = self.state();
                state.posts = posts;
                state.source = Some(RefreshSource::Backend);
                drop(state);
                return self.settle(Ok(RefreshSource::Backend));
            }
            Err(e) => e,
        };

        let result = match &self.fallback {
            Some(fallback) => {
                warn!("backend unavailable ({}), using development posts", primary_err);
                match fallback.all_posts().await {
                    Ok(posts) => {
                        let mut state = self.state();
                        state.posts = posts;
                        state.source = Some(RefreshSource::Fallback);
                        Ok(RefreshSource::Fallback)
                    }
                    Err(e) => {
                        *self.state() = PostState::default();
                        Err(StoreError::Unavailable(e.to_string()))
                    }
                }
            }
            None => {
                *self.state() = PostState::default();
                Err(StoreError::Unavailable(primary_err.to_string()))
            }
        };
        self.settle(result)
    }

    /// Searches posts by keyword. The loaded list is left untouched.
    pub async fn search(&self, keyword: &str) -> Result<Vec<Post>, StoreError> {
        let keyword = keyword.trim();
        let result = if keyword.is_empty() {
            Err(StoreError::Validation("search keyword is empty".to_string()))
        } else {
            self.active()
                .search_posts(keyword)
                .await
                .map_err(StoreError::from)
        };
        self.settle(result)
    }

    pub async fn create(&self, request: &CreatePostRequest) -> Result<(), StoreError> {
        let result = self.create_inner(request).await;
        self.settle(result)
    }

    async fn create_inner(&self, request: &CreatePostRequest) -> Result<(), StoreError> {
        require("title", &request.title)?;
        require("content", &request.content)?;
        let backend = self.active();
        backend.create_post(request).await?;
        self.reload(backend.as_ref()).await
    }

    pub async fn update(&self, post_id: &str, request: &UpdatePostRequest) -> Result<(), StoreError> {
        let result = self.update_inner(post_id, request).await;
        self.settle(result)
    }

    async fn update_inner(&self, post_id: &str, request: &UpdatePostRequest) -> Result<(), StoreError> {
        if let Some(title) = &request.title {
            require("title", title)?;
        }
        if let Some(content) = &request.content {
            require("content", content)?;
        }
        self.ensure_known(post_id)?;
        let backend = self.active();
        backend.update_post(post_id, request).await?;
        self.reload(backend.as_ref()).await
    }

    pub async fn delete(&self, post_id: &str) -> Result<(), StoreError> {
        let result = self.delete_inner(post_id).await;
        self.settle(result)
    }

    async fn delete_inner(&self, post_id: &str) -> Result<(), StoreError> {
        self.ensure_known(post_id)?;
        let backend = self.active();
        backend.delete_post(post_id).await?;
        self.reload(backend.as_ref()).await
    }

    fn ensure_known(&self, post_id: &str) -> Result<(), StoreError> {
        if self.state().posts.iter().any(|p| p.id == post_id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(post_id.to_string()))
        }
    }

    async fn reload(&self, backend: &dyn PostBackend) -> Result<(), StoreError> {
        let posts = backend.all_posts().await?;
        self.state().posts = posts;
        Ok(())
    }

    pub fn posts(&self) -> Vec<Post> {
        self.state().posts.clone()
    }

    pub fn post(&self, post_id: &str) -> Option<Post> {
        self.state().posts.iter().find(|p| p.id == post_id).cloned()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    pub fn source(&self) -> Option<RefreshSource> {
        self.state().source
    }

    pub fn clear(&self) {
        *self.state() = PostState::default();
    }
}

fn require(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        Err(StoreError::Validation(format!("{} is empty", field)))
    } else {
        Ok(())
    }
}
