//! Biblioteca admin client
//!
//! Administration client for the Biblioteca library backend: session
//! handling with persisted login, route guards, and generic filterable,
//! sortable, paginated tables over the books, authors, genres and loans
//! collections of its REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod detail;
pub mod error;
pub mod menu;
pub mod models;
pub mod notice;
pub mod routes;
pub mod services;
pub mod session;
pub mod table;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across pages
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: session::SessionContext,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Restore the persisted session and build the services around it
    pub fn new(config: AppConfig, storage: Arc<dyn session::SessionStorage>) -> AppResult<Self> {
        let session = session::SessionContext::rehydrate(storage);
        let services = services::Services::new(&config, session.clone())?;
        Ok(Self {
            config: Arc::new(config),
            session,
            services: Arc::new(services),
        })
    }
}
