//! Session/authentication state: who is logged in, persisted across restarts

pub mod context;
pub mod storage;
pub mod token;

pub use context::{SessionContext, Subscription};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};

use crate::models::{AuthResponse, Role, User};

/// Current token and resolved user. Both are present or both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub(crate) fn signed_in(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(User::role)
    }

    pub fn state(&self) -> SessionState {
        if self.user.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// Token present and unexpired, and a profile loaded
    pub fn is_authenticated(&self) -> bool {
        match (&self.token, &self.user) {
            (Some(token), Some(_)) => !token::is_expired(token),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// The only ways the session may change
#[derive(Debug, Clone)]
pub enum SessionChange {
    SignedIn(AuthResponse),
    SignedOut,
}
