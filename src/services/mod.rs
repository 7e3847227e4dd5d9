//! Page-level services built on the API client and the session

pub mod auth;
pub mod dashboard;
pub mod pages;

pub use auth::AuthService;
pub use dashboard::{BorrowOutcome, CatalogFilter, Dashboard};
pub use pages::{IntentKind, IntentOutcome, ListPage, PageResource, RowIntent, SaveOutcome};

use std::sync::Arc;

use crate::{
    api::{ApiClient, Autores, Generos, HttpAuthGateway, Libros, Prestamos, ResourceClient},
    config::{AppConfig, TableConfig},
    error::AppResult,
    session::SessionContext,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub api: ApiClient,
    pub auth: AuthService,
    table: TableConfig,
}

impl Services {
    /// Create all services around the given session
    pub fn new(config: &AppConfig, session: SessionContext) -> AppResult<Self> {
        let api = ApiClient::new(&config.api, session.clone())?;
        let gateway = Arc::new(HttpAuthGateway::new(api.clone()));
        Ok(Self {
            auth: AuthService::new(gateway, session),
            api,
            table: config.table.clone(),
        })
    }

    pub fn libros(&self) -> ListPage<Libros> {
        ListPage::new(ResourceClient::new(self.api.clone()), &self.table)
    }

    pub fn autores(&self) -> ListPage<Autores> {
        ListPage::new(ResourceClient::new(self.api.clone()), &self.table)
    }

    pub fn generos(&self) -> ListPage<Generos> {
        ListPage::new(ResourceClient::new(self.api.clone()), &self.table)
    }

    pub fn prestamos(&self) -> ListPage<Prestamos> {
        ListPage::new(ResourceClient::new(self.api.clone()), &self.table)
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.api.clone())
    }
}
