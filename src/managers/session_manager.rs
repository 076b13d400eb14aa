//! Session Manager for Stampbook.
//!
//! Persists the access token and the cached user object in local storage
//! under the `accessToken` / `userData` keys, and carries the
//! "login required" signal raised when the backend rejects the token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use log::{info, warn};

use crate::database::LocalStorage;
use crate::types::errors::SessionError;
use crate::types::user::User;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const USER_DATA_KEY: &str = "userData";

/// Trait defining session management operations.
pub trait SessionManagerTrait {
    fn login(&self, token: &str, user: Option<&User>) -> Result<(), SessionError>;
    fn logout(&self) -> Result<(), SessionError>;
    fn token(&self) -> Option<String>;
    fn current_user(&self) -> Option<User>;
    fn is_logged_in(&self) -> bool;
    fn restore(&self) -> Result<Option<User>, SessionError>;
    fn update_nickname(&self, nickname: &str) -> Result<User, SessionError>;
    fn handle_unauthorized(&self);
    fn take_login_required(&self) -> bool;
}

/// Session manager backed by the SQLite local storage table.
///
/// Shared between the HTTP backend (which reads the token and reacts to
/// 401s) and the application layer, so all state sits behind locks.
pub struct SessionManager {
    storage: Mutex<LocalStorage>,
    login_required: AtomicBool,
}

impl SessionManager {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage: Mutex::new(storage),
            login_required: AtomicBool::new(false),
        }
    }

    fn storage(&self) -> Result<MutexGuard<'_, LocalStorage>, SessionError> {
        self.storage
            .lock()
            .map_err(|e| SessionError::Database(e.to_string()))
    }

    fn read_user(&self) -> Result<Option<User>, SessionError> {
        let raw = self
            .storage()?
            .get_item(USER_DATA_KEY)
            .map_err(|e| SessionError::Database(e.to_string()))?;
        match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| SessionError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    fn write_user(&self, user: &User) -> Result<(), SessionError> {
        let json =
            serde_json::to_string(user).map_err(|e| SessionError::Serialization(e.to_string()))?;
        self.storage()?
            .set_item(USER_DATA_KEY, &json)
            .map_err(|e| SessionError::Database(e.to_string()))
    }

    fn clear_keys(&self) -> Result<(), SessionError> {
        let storage = self.storage()?;
        storage
            .remove_item(ACCESS_TOKEN_KEY)
            .and_then(|_| storage.remove_item(USER_DATA_KEY))
            .map_err(|e| SessionError::Database(e.to_string()))
    }
}

impl SessionManagerTrait for SessionManager {
    /// Stores the token, and the user when provided. Clears any pending login request.
    fn login(&self, token: &str, user: Option<&User>) -> Result<(), SessionError> {
        self.storage()?
            .set_item(ACCESS_TOKEN_KEY, token)
            .map_err(|e| SessionError::Database(e.to_string()))?;
        if let Some(user) = user {
            self.write_user(user)?;
        }
        self.login_required.store(false, Ordering::SeqCst);
        info!("session started");
        Ok(())
    }

    fn logout(&self) -> Result<(), SessionError> {
        self.clear_keys()?;
        info!("session ended");
        Ok(())
    }

    fn token(&self) -> Option<String> {
        self.storage()
            .ok()
            .and_then(|s| s.get_item(ACCESS_TOKEN_KEY).ok().flatten())
    }

    fn current_user(&self) -> Option<User> {
        self.read_user().ok().flatten()
    }

    /// Logged in means both a token and a parsable cached user are present.
    fn is_logged_in(&self) -> bool {
        self.token().is_some() && self.current_user().is_some()
    }

    /// Reads the persisted session at startup.
    ///
    /// Corrupt user data wipes both keys and reports a logged-out session.
    fn restore(&self) -> Result<Option<User>, SessionError> {
        if self.token().is_none() {
            return Ok(None);
        }
        match self.read_user() {
            Ok(user) => Ok(user),
            Err(SessionError::Serialization(msg)) => {
                warn!("discarding unreadable cached user: {}", msg);
                self.clear_keys()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn update_nickname(&self, nickname: &str) -> Result<User, SessionError> {
        let mut user = self.read_user()?.ok_or(SessionError::NotLoggedIn)?;
        user.nickname = Some(nickname.to_string());
        self.write_user(&user)?;
        Ok(user)
    }

    /// Reaction to a 401: drop the token and ask the UI to show the login entry point.
    fn handle_unauthorized(&self) {
        if let Ok(storage) = self.storage() {
            if let Err(e) = storage.remove_item(ACCESS_TOKEN_KEY) {
                warn!("failed to clear access token: {}", e);
            }
        }
        self.login_required.store(true, Ordering::SeqCst);
        warn!("backend rejected the access token, login required");
    }

    fn take_login_required(&self) -> bool {
        self.login_required.swap(false, Ordering::SeqCst)
    }
}
