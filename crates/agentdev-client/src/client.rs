//! HTTP plumbing shared by every endpoint group.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::api::{AgentsApi, ArtifactsApi, AuthApi, MessagesApi, ProjectsApi};
use crate::error::{ClientError, Result};
use crate::session::SessionStore;
use crate::types::ServiceInfo;

/// Prefix of every versioned endpoint, relative to the server root.
pub const API_PREFIX: &str = "api/v1/";

/// Seconds to wait after a 429 without a usable `Retry-After`.
const DEFAULT_RETRY_AFTER: u64 = 60;

/// Bearer-authenticated client for the AgentDev REST API.
///
/// Every request carries the stored access token. A 401 from any endpoint
/// clears the stored session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: &str, store: Arc<SessionStore>) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: normalize_base(base_url)?,
            store,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.store
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn projects(&self) -> ProjectsApi<'_> {
        ProjectsApi::new(self)
    }

    pub fn agents(&self) -> AgentsApi<'_> {
        AgentsApi::new(self)
    }

    pub fn messages(&self) -> MessagesApi<'_> {
        MessagesApi::new(self)
    }

    pub fn artifacts(&self) -> ArtifactsApi<'_> {
        ArtifactsApi::new(self)
    }

    /// GET / - Service banner. Needs no session.
    pub async fn service_info(&self) -> Result<ServiceInfo> {
        let url = self.base_url.clone();
        self.execute(self.http.get(url)).await
    }

    /// Builds a request to `path` under `/api/v1/`, with the bearer token if logged in.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(API_PREFIX)?.join(path)?;
        debug!(%method, %url, "API request");
        let builder = self.http.request(method, url);
        Ok(match self.store.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Sends the request and decodes a JSON body.
    pub(crate) async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends the request and discards the body.
    pub(crate) async fn execute_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.check(builder.send().await?).await?;
        Ok(())
    }

    /// Maps non-success statuses to errors. A 401 logs the session out.
    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER);
            return Err(ClientError::RateLimited { retry_after_secs });
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body, status);

        if status == StatusCode::UNAUTHORIZED {
            if self.store.is_authenticated() {
                warn!(error = %message, "Server rejected the session; logging out");
            }
            self.store.logout()?;
            return Err(ClientError::Unauthorized(message));
        }

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Ensures the base URL ends in `/` so relative joins keep its path.
fn normalize_base(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// The `error` field of a JSON error body, else the raw body, else the status reason.
fn error_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            return error.to_string();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
