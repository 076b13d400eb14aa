//! App Core for Stampbook.
//!
//! Central struct wiring the session, backends, stores, completion detector
//! and map viewport together and managing the application lifecycle.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::api::{AccountBackend, FakeBackend, HttpBackend, PostBackend, StampBackend};
use crate::database::{Database, LocalStorage};
use crate::managers::account::AccountService;
use crate::managers::post_store::PostStore;
use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::managers::stamp_store::{RefreshSource, StampStore};
use crate::map::{HeadlessMap, MapSdk, MapViewport};
use crate::services::completion::CompletionDetector;
use crate::services::membership::PlaceDetail;
use crate::types::bookmark::PlaceKey;
use crate::types::errors::{ApiError, MapError, SessionError, StoreError};
use crate::types::settings::ClientSettings;
use crate::types::stamp_board::{BoardUpdate, StampBoard};
use crate::types::user::User;

/// The backend implementations the stores talk to.
pub struct Backends {
    pub stamps: Arc<dyn StampBackend>,
    pub posts: Arc<dyn PostBackend>,
    pub account: Arc<dyn AccountBackend>,
}

impl Backends {
    /// The REST backend for everything.
    pub fn http(settings: &ClientSettings, session: Arc<SessionManager>) -> Result<Self, ApiError> {
        let http = Arc::new(HttpBackend::new(&settings.api, session)?);
        Ok(Self {
            stamps: http.clone(),
            posts: http.clone(),
            account: http,
        })
    }

    /// One simulated backend for everything.
    pub fn fake(fake: Arc<FakeBackend>) -> Self {
        Self {
            stamps: fake.clone(),
            posts: fake.clone(),
            account: fake,
        }
    }
}

/// Central application struct.
pub struct App<S: MapSdk = HeadlessMap> {
    pub settings: ClientSettings,
    pub session: Arc<SessionManager>,
    pub stamps: StampStore,
    pub posts: PostStore,
    pub account: AccountService,
    pub completion: CompletionDetector,
    pub map: MapViewport<S>,
    fallback: Option<Arc<FakeBackend>>,
}

impl<S: MapSdk> App<S> {
    /// Opens the local storage database at `db_path` and talks to the REST backend.
    pub fn new(settings: ClientSettings, db_path: &str, sdk: S) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open(db_path)?;
        let session = Arc::new(SessionManager::new(LocalStorage::new(db)));
        let backends = Backends::http(&settings, session.clone())?;
        Ok(Self::assemble(settings, session, backends, sdk))
    }

    /// Wires the app around the given backends. In development mode the
    /// stores also get a simulated backend to fall back on.
    pub fn assemble(
        settings: ClientSettings,
        session: Arc<SessionManager>,
        backends: Backends,
        sdk: S,
    ) -> Self {
        let fallback = if settings.development_mode {
            let latency = Duration::from_millis(settings.fake_latency_ms);
            Some(Arc::new(FakeBackend::new().with_latency(latency)))
        } else {
            None
        };

        let mut stamps = StampStore::new(backends.stamps);
        let mut posts = PostStore::new(backends.posts);
        if let Some(fake) = &fallback {
            stamps = stamps.with_dev_fallback(fake.clone());
            posts = posts.with_dev_fallback(fake.clone());
        }
        let account = AccountService::new(backends.account, session.clone());
        let map = MapViewport::new(sdk, settings.map.clone());

        Self {
            settings,
            session,
            stamps,
            posts,
            account,
            completion: CompletionDetector::new(),
            map,
            fallback,
        }
    }

    /// The development-mode simulated backend, if enabled.
    pub fn fallback(&self) -> Option<&Arc<FakeBackend>> {
        self.fallback.as_ref()
    }

    /// Startup sequence: restore the session and, when signed in, load data.
    ///
    /// Returns the restored user. Load failures are left in the stores'
    /// `last_error` rather than aborting startup.
    pub async fn startup(&mut self) -> Result<Option<User>, SessionError> {
        let user = self.session.restore()?;
        match &user {
            Some(u) => {
                info!("restored session for {}", u.email);
                if let Err(e) = self.refresh_stamps().await {
                    warn!("initial stamp load failed: {}", e);
                }
                if let Err(e) = self.posts.refresh().await {
                    warn!("initial post load failed: {}", e);
                }
            }
            None => info!("no stored session"),
        }
        Ok(user)
    }

    /// Re-runs the completion detector over the current boards.
    fn detect_completion(&mut self) -> Vec<String> {
        let data = self.stamps.snapshot();
        self.completion.evaluate(&data.stamp_boards)
    }

    pub async fn refresh_stamps(&mut self) -> Result<RefreshSource, StoreError> {
        let source = self.stamps.refresh().await?;
        self.detect_completion();
        Ok(source)
    }

    /// Sets a bookmark's visited flag. Returns boards that just completed.
    pub fn toggle_visited(&mut self, bookmark_id: &str, visited: bool) -> Result<Vec<String>, StoreError> {
        self.stamps.toggle_visited(bookmark_id, visited)?;
        Ok(self.detect_completion())
    }

    pub async fn create_board(&mut self, title: &str, color: &str) -> Result<StampBoard, StoreError> {
        let board = self.stamps.create_board(title, color).await?;
        self.detect_completion();
        Ok(board)
    }

    pub async fn update_board(&mut self, board_id: &str, update: &BoardUpdate) -> Result<(), StoreError> {
        let result = self.stamps.update_board(board_id, update).await;
        self.detect_completion();
        result
    }

    pub async fn delete_board(&mut self, board_id: &str) -> Result<(), StoreError> {
        self.stamps.delete_board(board_id).await?;
        self.detect_completion();
        Ok(())
    }

    /// Adds a bookmark to a board. Returns boards that just completed.
    pub async fn add_to_board(&mut self, board_id: &str, bookmark_id: &str) -> Result<Vec<String>, StoreError> {
        self.stamps.add_to_board(board_id, bookmark_id).await?;
        Ok(self.detect_completion())
    }

    /// Removes a bookmark from a board. Returns boards that just completed.
    pub async fn remove_from_board(&mut self, board_id: &str, bookmark_id: &str) -> Result<Vec<String>, StoreError> {
        self.stamps.remove_from_board(board_id, bookmark_id).await?;
        Ok(self.detect_completion())
    }

    /// Detail view for a place selected on the map or in search.
    pub fn place_detail(&self, key: &PlaceKey) -> PlaceDetail {
        let saved = self.stamps.saved_bookmarks(None);
        PlaceDetail::resolve(&self.stamps.snapshot(), &saved, key)
    }

    /// Loads the map SDK if needed and draws every saved place.
    pub async fn show_map(&mut self) -> Result<usize, MapError> {
        self.map.load().await?;
        let data = self.stamps.snapshot();
        let saved = self.stamps.saved_bookmarks(None);
        self.map.show(&data, &saved)
    }

    /// Ends the session and drops loaded data. Celebrated boards stay
    /// celebrated until the process exits.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.session.logout()?;
        self.stamps.clear();
        self.posts.clear();
        info!("logged out");
        Ok(())
    }

    /// True once after the backend rejected the stored token.
    pub fn take_login_required(&self) -> bool {
        self.session.take_login_required()
    }
}
