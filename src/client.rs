// Authenticated HTTP client for the CMS API
// Pipeline per request: attach token, send, refresh-and-retry once on 401,
// unwrap the response envelope

use anyhow::Context;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::auth::{self, TokenStore};
use crate::error::ApiError;
use crate::models::Envelope;

type SessionExpiredHook = Box<dyn Fn() + Send + Sync>;

/// HTTP client that transparently attaches the stored access token and
/// recovers from an expired token by refreshing and replaying the request
/// exactly once.
pub struct ApiClient {
    /// Shared HTTP client with connection pooling and the session cookie jar
    http: Client,

    /// API base URL, no trailing slash
    base_url: String,

    /// Persistent access token storage
    store: Arc<dyn TokenStore>,

    /// Serializes refresh calls so concurrent 401s trigger one refresh
    refresh_gate: Mutex<()>,

    /// Invoked exactly once per failed refresh, after the token is cleared
    on_session_expired: Option<SessionExpiredHook>,
}

impl ApiClient {
    /// Create a new client. The cookie store is enabled because the
    /// refresh endpoint authenticates with an ambient session cookie.
    pub fn new(
        base_url: &str,
        store: Arc<dyn TokenStore>,
        connect_timeout: u64,
        request_timeout: u64,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .timeout(Duration::from_secs(request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            refresh_gate: Mutex::new(()),
            on_session_expired: None,
        })
    }

    /// Install the hook run when a refresh fails and the session ends
    pub fn with_session_expired_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Box::new(hook));
        self
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {path}` with optional query parameters
    pub async fn get<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.dispatch(&|| Ok(self.request(Method::GET, path, query, None::<&()>)))
            .await
    }

    /// `POST {path}` with an optional JSON body
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(&|| Ok(self.request(Method::POST, path, None::<&()>, body)))
            .await
    }

    /// `PATCH {path}` with an optional JSON body
    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(&|| Ok(self.request(Method::PATCH, path, None::<&()>, body)))
            .await
    }

    /// `PUT {path}` with an optional JSON body
    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(&|| Ok(self.request(Method::PUT, path, None::<&()>, body)))
            .await
    }

    /// `DELETE {path}`
    pub async fn delete<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.dispatch(&|| Ok(self.request(Method::DELETE, path, None::<&()>, None::<&()>)))
            .await
    }

    /// `POST {path}` with a multipart form holding one file field.
    ///
    /// The form is rebuilt per attempt because multipart bodies cannot be
    /// cloned for the 401 replay.
    pub async fn post_multipart<T>(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.dispatch(&|| {
            let part = reqwest::multipart::Part::bytes(bytes.clone())
                .file_name(file_name.to_string())
                .mime_str(mime)?;
            let form = reqwest::multipart::Form::new().part(field.to_string(), part);
            Ok(self
                .http
                .post(format!("{}{}", self.base_url, path))
                .multipart(form))
        })
        .await
    }

    fn request<Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> RequestBuilder
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
    }

    /// Run one logical request through the pipeline.
    ///
    /// The retried marker is a local of this call, so concurrent requests
    /// can never interfere with each other's retry state.
    async fn dispatch<T>(
        &self,
        build: &dyn Fn() -> Result<RequestBuilder, ApiError>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        // Token presence is re-read from storage per dispatch, never cached
        // across requests
        let mut token = self.store.get().map_err(ApiError::Internal)?;
        let mut retried = false;

        loop {
            let mut request = build()?;
            if let Some(ref t) = token {
                request = request.bearer_auth(t);
            }

            let response = request.send().await?;
            let status = response.status();
            tracing::debug!(status = %status, "Received API response");

            if status == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                tracing::debug!("Received 401, attempting token refresh");
                token = Some(self.refresh_after_unauthorized(token.as_deref()).await?);
                continue;
            }

            return unwrap_envelope(status, response).await;
        }
    }

    /// Refresh the access token after a 401.
    ///
    /// Refreshes are single-flight: a request that loses the race re-reads
    /// the store and skips its own refresh when a newer token already
    /// arrived. On refresh failure the token is cleared and the
    /// session-expired hook runs before the error propagates.
    async fn refresh_after_unauthorized(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.store.get().map_err(ApiError::Internal)? {
            if stale != Some(current.as_str()) {
                tracing::debug!("Token already replaced by a concurrent refresh");
                return Ok(current);
            }
        }

        match auth::refresh_access_token(&self.http, &self.base_url).await {
            Ok(token) => {
                self.store.put(&token).map_err(ApiError::Internal)?;
                Ok(token)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Token refresh failed, ending session");
                self.store.clear().map_err(ApiError::Internal)?;
                if let Some(hook) = &self.on_session_expired {
                    hook();
                }
                let message = match &err {
                    ApiError::Api { message, .. } => message.clone(),
                    ApiError::Unauthorized(message) => message.clone(),
                    other => other.to_string(),
                };
                Err(ApiError::SessionExpired(message))
            }
        }
    }
}

/// Decode the uniform envelope and extract `data`.
///
/// `success=false` is a failure even on a 2xx status; a terminal 401 maps
/// to `Unauthorized`.
async fn unwrap_envelope<T>(status: StatusCode, response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let body = response.text().await?;

    let envelope: Envelope<T> = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            if status.is_success() {
                return Err(ApiError::Decode(format!("Invalid response envelope: {}", err)));
            }
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: truncate(&body, 200),
                code: None,
                details: None,
            });
        }
    };

    if status.is_success() && envelope.success {
        return match envelope.data {
            Some(data) => Ok(data),
            // Void operations omit `data`; decode the unit type from null
            None => serde_json::from_value(serde_json::Value::Null)
                .map_err(|_| ApiError::Decode("Response envelope has no data".to_string())),
        };
    }

    let (code, details) = envelope
        .error
        .map(|e| (Some(e.code), e.details))
        .unwrap_or((None, None));

    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized(envelope.message));
    }

    Err(ApiError::Api {
        status: status.as_u16(),
        message: envelope.message,
        code,
        details,
    })
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new("http://localhost:8000/api/v1/", store, 10, 30).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 200), "short");
        let long = "x".repeat(300);
        assert_eq!(truncate(&long, 200).chars().count(), 200);
    }
}
