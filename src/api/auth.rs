//! Login endpoint

use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use super::ApiClient;
use crate::{
    error::{AppError, AppResult},
    models::{AuthResponse, LoginRequest},
};

/// Exchanges credentials for a token and user profile
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// HTTP 400 maps to [`AppError::InvalidCredentials`]; every other
    /// failure maps to [`AppError::Unexpected`].
    async fn login(&self, request: &LoginRequest) -> AppResult<AuthResponse>;
}

/// `POST {auth_base}/login`
#[derive(Clone, Debug)]
pub struct HttpAuthGateway {
    api: ApiClient,
}

impl HttpAuthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, request: &LoginRequest) -> AppResult<AuthResponse> {
        let url = self.api.auth_url("login");
        let response = self
            .api
            .anonymous_request(Method::POST, &url)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Unexpected(format!("Login request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => response
                .json::<AuthResponse>()
                .await
                .map_err(|e| AppError::Unexpected(format!("Invalid login response: {}", e))),
            StatusCode::BAD_REQUEST => Err(AppError::InvalidCredentials),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::Unexpected(format!("Login failed with {}: {}", status, body)))
            }
        }
    }
}
