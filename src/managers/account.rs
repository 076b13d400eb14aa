//! Account Service for Stampbook.
//!
//! Signs the user in by exchanging an identity token, keeps the cached user
//! in sync with nickname edits, and ends the session.

use std::sync::Arc;

use log::info;

use crate::api::AccountBackend;
use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::types::errors::{AccountError, SessionError};
use crate::types::user::User;

pub struct AccountService {
    backend: Arc<dyn AccountBackend>,
    session: Arc<SessionManager>,
}

impl AccountService {
    pub fn new(backend: Arc<dyn AccountBackend>, session: Arc<SessionManager>) -> Self {
        Self { backend, session }
    }

    /// Exchanges a Google identity token for an access token and persists both
    /// the token and the returned user.
    pub async fn login_with_google(&self, id_token: &str) -> Result<User, AccountError> {
        if id_token.trim().is_empty() {
            return Err(AccountError::Validation("identity token is empty".to_string()));
        }
        let response = self.backend.google_login(id_token).await?;
        self.session
            .login(&response.access_token, Some(&response.user))?;
        info!("signed in as {}", response.user.email);
        Ok(response.user)
    }

    /// Fetches the current user and refreshes the cached copy.
    pub async fn fetch_me(&self) -> Result<User, AccountError> {
        let token = self.session.token().ok_or(SessionError::NotLoggedIn)?;
        let user = self.backend.me().await?;
        self.session.login(&token, Some(&user))?;
        Ok(user)
    }

    pub async fn change_nickname(&self, nickname: &str) -> Result<User, AccountError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(AccountError::Validation("nickname is empty".to_string()));
        }
        if !self.session.is_logged_in() {
            return Err(SessionError::NotLoggedIn.into());
        }
        self.backend.update_nickname(nickname).await?;
        Ok(self.session.update_nickname(nickname)?)
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    pub fn logout(&self) -> Result<(), AccountError> {
        Ok(self.session.logout()?)
    }
}
