// Session operations
// Login and logout also maintain the persisted token and the query cache

use super::store::TokenStore as _;
use super::types::{AuthSession, ChangePasswordRequest, LoginRequest};
use crate::api::CmsApi;
use crate::error::{ApiError, Result};
use crate::models::User;

impl CmsApi {
    /// `POST /auth/login` — persists the returned access token
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session: AuthSession = self.client().post("/auth/login", Some(&request)).await?;

        self.client()
            .store()
            .put(&session.access_token)
            .map_err(ApiError::Internal)?;
        self.cache().clear();

        tracing::info!(user = %session.user.email, "Logged in");
        Ok(session)
    }

    /// `POST /auth/logout` — the server ends the session, then local
    /// state is dropped
    pub async fn logout(&self) -> Result<()> {
        self.client()
            .post::<(), _>("/auth/logout", Some(&serde_json::json!({})))
            .await?;

        self.client().store().clear().map_err(ApiError::Internal)?;
        self.cache().clear();
        Ok(())
    }

    /// `GET /auth/me` — the currently signed-in account
    pub async fn me(&self) -> Result<User> {
        self.client().get("/auth/me", None::<&()>).await
    }

    /// `POST /auth/change-password`
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<()> {
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.client()
            .post::<(), _>("/auth/change-password", Some(&request))
            .await
    }

    /// Force a refresh now and persist the new token
    pub async fn refresh_session(&self) -> Result<String> {
        let token =
            super::refresh_access_token(self.client().http(), self.client().base_url()).await?;
        self.client()
            .store()
            .put(&token)
            .map_err(ApiError::Internal)?;
        Ok(token)
    }
}
