//! Login / logout orchestration

use std::sync::Arc;

use validator::Validate;

use crate::{
    api::AuthGateway,
    error::AppResult,
    models::LoginForm,
    routes::{Redirect, Route},
    session::{SessionChange, SessionContext},
};

#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
    session: SessionContext,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn AuthGateway>, session: SessionContext) -> Self {
        Self { gateway, session }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Authenticate and start a session.
    ///
    /// The form is validated before any request is made. The session is
    /// left untouched on every failure.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Redirect> {
        let form = LoginForm::new(email.trim(), password);
        form.validate()?;

        let response = self.gateway.login(&form.into()).await.map_err(|e| {
            tracing::warn!("Login failed: {}", e);
            e
        })?;

        tracing::info!(user_id = %response.user.id, role = %response.user.tipo_usuario, "User logged in");
        self.session.apply(SessionChange::SignedIn(response))?;
        Ok(Redirect(Route::Dashboard))
    }

    /// End the session. Idempotent.
    pub fn logout(&self) -> Redirect {
        if let Err(e) = self.session.apply(SessionChange::SignedOut) {
            tracing::warn!("Logout could not clear the session: {}", e);
        }
        tracing::info!("User logged out");
        Redirect(Route::Login)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
