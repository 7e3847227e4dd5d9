//! Injected session holder with a listener interface

use std::sync::{Arc, Mutex, Weak};

use super::storage::{SessionStorage, TOKEN_KEY, USER_KEY};
use super::{token, Session, SessionChange, SessionState};
use crate::error::AppResult;
use crate::models::{Role, User};

type Listener = Arc<dyn Fn(&Session) + Send + Sync>;

#[derive(Default)]
struct Inner {
    session: Session,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

/// Single source of truth for the current session.
///
/// Cloning is cheap; clones share state. Mutation goes through
/// [`SessionContext::apply`] only, which persists to storage before the
/// in-memory value changes and notifies listeners after the internal lock is
/// released, so listeners may read the context. Concurrent `apply` calls are
/// serialized from the storage write through the in-memory swap.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Mutex<Inner>>,
    writer: Arc<Mutex<()>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionContext {
    /// Start anonymous, ignoring anything already in storage
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            writer: Arc::new(Mutex::new(())),
            storage,
        }
    }

    /// Restore the persisted session without contacting the server.
    ///
    /// A missing or expired token, or an unreadable profile, clears storage
    /// and starts anonymous.
    pub fn rehydrate(storage: Arc<dyn SessionStorage>) -> Self {
        let context = Self::new(storage);
        match context.load_persisted() {
            Ok(Some(session)) => {
                tracing::debug!("Restored session from storage");
                context.lock().session = session;
            }
            Ok(None) => {
                context.clear_storage();
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable persisted session: {}", e);
                context.clear_storage();
            }
        }
        context
    }

    fn load_persisted(&self) -> AppResult<Option<Session>> {
        let Some(user_data) = self.storage.get(USER_KEY)? else {
            return Ok(None);
        };
        let Some(token) = self.storage.get(TOKEN_KEY)? else {
            return Ok(None);
        };
        if token::is_expired(&token) {
            tracing::info!("Persisted token has expired");
            return Ok(None);
        }
        let user: User = serde_json::from_str(&user_data)?;
        Ok(Some(Session::signed_in(token, user)))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> Session {
        self.lock().session.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.lock().session.token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.lock().session.user.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.lock().session.role()
    }

    pub fn state(&self) -> SessionState {
        self.lock().session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().session.is_authenticated()
    }

    /// Apply a session change: persist, update memory, notify listeners.
    ///
    /// `SignedIn` fails without touching the in-memory session when storage
    /// cannot be written. `SignedOut` never fails; storage errors are logged.
    pub fn apply(&self, change: SessionChange) -> AppResult<()> {
        let (session, listeners) = {
            let _writing = self.writer.lock().unwrap_or_else(|e| e.into_inner());
            let next = match change {
                SessionChange::SignedIn(response) => {
                    self.persist(&response.access_token, &response.user)?;
                    Session::signed_in(response.access_token, response.user)
                }
                SessionChange::SignedOut => {
                    self.clear_storage();
                    Session::anonymous()
                }
            };

            let mut inner = self.lock();
            if inner.session == next {
                return Ok(());
            }
            inner.session = next;
            let listeners: Vec<Listener> = inner.listeners.iter().map(|(_, l)| l.clone()).collect();
            (inner.session.clone(), listeners)
        };

        tracing::debug!(state = ?session.state(), "Session changed");
        for listener in listeners {
            listener(&session);
        }
        Ok(())
    }

    /// Sign out when the held token has expired. Returns true if it did.
    pub fn expire_if_stale(&self) -> bool {
        let stale = self
            .token()
            .map(|t| token::is_expired(&t))
            .unwrap_or(false);
        if stale {
            tracing::info!("Session token expired, signing out");
            let _ = self.apply(SessionChange::SignedOut);
        }
        stale
    }

    fn persist(&self, token: &str, user: &User) -> AppResult<()> {
        let user_data = serde_json::to_string(user)?;
        self.storage.set(TOKEN_KEY, token)?;
        if let Err(e) = self.storage.set(USER_KEY, &user_data) {
            if let Err(rollback) = self.storage.remove(TOKEN_KEY) {
                tracing::warn!("Failed to roll back persisted token: {}", rollback);
            }
            return Err(e);
        }
        Ok(())
    }

    fn clear_storage(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!("Failed to remove '{}' from session storage: {}", key, e);
            }
        }
    }

    /// Register a listener. It receives the current session immediately and
    /// then every change, until the returned handle is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let (id, current) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener.clone()));
            (id, inner.session.clone())
        };
        listener(&current);
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("SessionContext")
            .field("state", &inner.session.state())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

/// Handle returned by [`SessionContext::subscribe`]
pub struct Subscription {
    inner: Weak<Mutex<Inner>>,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        let (Some(id), Some(inner)) = (self.id.take(), self.inner.upgrade()) else {
            return;
        };
        let mut inner = inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.listeners.retain(|(lid, _)| *lid != id);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
