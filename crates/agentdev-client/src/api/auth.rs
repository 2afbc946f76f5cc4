//! `/auth` endpoints.

use reqwest::Method;
use tracing::{info, warn};

use agentdev_models::User;

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::types::{Ack, Credentials, LoginResponse, RefreshToken};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Logs in and stores the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = self
            .client
            .request(Method::POST, "auth/login")?
            .json(&Credentials { email, password });
        let response: LoginResponse = self.client.execute(request).await?;
        let user = self.store(response)?;
        info!(user_id = %user.user_id, "Logged in");
        Ok(user)
    }

    /// Revokes the session on the server, then clears it locally even if that failed.
    pub async fn logout(&self) -> Result<()> {
        let store = self.client.session_store();
        if !store.is_authenticated() {
            return Ok(());
        }
        let remote = match self.client.request(Method::POST, "auth/logout") {
            Ok(request) => self.client.execute::<Ack>(request).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = &remote {
            warn!(error = %e, "Server logout failed; clearing local session anyway");
        }
        store.logout()
    }

    /// Trades the stored refresh token for a new session.
    pub async fn refresh(&self) -> Result<User> {
        let session = self
            .client
            .session_store()
            .current()
            .ok_or(ClientError::NotLoggedIn)?;
        let request = self
            .client
            .request(Method::POST, "auth/refresh")?
            .json(&RefreshToken {
                refresh_token: &session.refresh_token,
            });
        let response: LoginResponse = self.client.execute(request).await?;
        self.store(response)
    }

    /// The user the server associates with the stored token.
    pub async fn me(&self) -> Result<User> {
        if !self.client.session_store().is_authenticated() {
            return Err(ClientError::NotLoggedIn);
        }
        let request = self.client.request(Method::GET, "auth/me")?;
        self.client.execute(request).await
    }

    fn store(&self, response: LoginResponse) -> Result<User> {
        let user = response.user_info.clone();
        self.client.session_store().login(Session {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user: response.user_info,
        })?;
        Ok(user)
    }
}
