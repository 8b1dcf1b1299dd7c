// Auth endpoints and session lifecycle

use super::Api;
use crate::auth::Session;
use crate::error::Result;
use crate::models::{AuthResponse, LoginCredentials, User};

impl Api {
    /// Exchange credentials for a token pair and persist it as the session
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse> {
        let request = self
            .http
            .client()
            .post(self.endpoint("/auth/login"))
            .json(credentials)
            .build()?;

        let response = self.http.execute(request).await?;
        let pair: AuthResponse = Self::parse(response).await?;

        self.auth.session_store().save(&Session {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
        })?;
        tracing::info!("Logged in, session persisted");

        Ok(pair)
    }

    /// Fetch the authenticated user's profile
    pub async fn profile(&self) -> Result<User> {
        let request = self
            .http
            .client()
            .get(self.endpoint("/auth/profile"))
            .build()?;

        let response = self.http.execute(request).await?;
        Self::parse(response).await
    }

    /// Drop the local session; the backend holds no server-side state for it
    pub fn logout(&self) -> Result<()> {
        self.auth.session_store().clear()
    }
}
