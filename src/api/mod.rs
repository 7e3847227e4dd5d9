//! HTTP client for the Biblioteca REST backend

pub mod auth;
pub mod resources;

pub use auth::{AuthGateway, HttpAuthGateway};
pub use resources::{Autores, Generos, Libros, Prestamos, Resource, ResourceClient};

use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    session::SessionContext,
};

/// Shared HTTP client. Attaches the session bearer token when one is held.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    auth_base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionContext) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_base_url: config.auth_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Absolute URL of a resource path (`libros`, `libros/3`, ...)
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/{}", self.auth_base_url, path.trim_start_matches('/'))
    }

    /// Start a request, with the bearer token when authenticated
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Start a request without credentials
    pub fn anonymous_request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Send and decode a JSON body
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send and discard the response body
    pub async fn send_empty(&self, builder: RequestBuilder) -> AppResult<()> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, %url, "Request failed");
        Err(AppError::from_status(status, body))
    }
}
