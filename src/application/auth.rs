/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Session state for Robinhood API authentication
//!
//! A session moves through three states:
//! - `Unauthenticated` (initial, and again after logout)
//! - `Authenticating` while a login round trip is in flight
//! - `Authenticated`, holding the token sent with every authenticated request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authentication state of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthState {
    /// No token held
    #[default]
    Unauthenticated,
    /// Credentials submitted, waiting for the server (and possibly an MFA code)
    Authenticating,
    /// Token held
    Authenticated,
}

/// Token and state of one client instance
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: AuthState,
    token: Option<String>,
    username: Option<String>,
    authenticated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates an unauthenticated session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state
    }

    /// True iff the session is authenticated and holds a non-empty token
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
            && self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Token, only while authenticated
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        if self.is_authenticated() {
            self.token.as_deref()
        } else {
            None
        }
    }

    /// Username the token was issued for
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// When the current token was obtained
    #[must_use]
    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.authenticated_at
    }

    /// Marks a login round trip as in flight
    pub fn begin_authentication(&mut self) {
        self.state = AuthState::Authenticating;
    }

    /// Stores a freshly issued token
    pub fn establish(&mut self, username: &str, token: &str) {
        self.state = AuthState::Authenticated;
        self.token = Some(token.to_string());
        self.username = Some(username.to_string());
        self.authenticated_at = Some(Utc::now());
    }

    /// Resets to the initial, unauthenticated state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
