//! Shared HTTP plumbing for the backend API.
//!
//! Every endpoint wrapper goes through [`ApiClient`]: one reqwest client,
//! one base URL, one bearer token slot, and one place that maps HTTP
//! failures onto [`SparrowError`].

use reqwest::header::HeaderValue;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sparrow_core::config::AppConfig;
use sparrow_core::error::{Result, SparrowError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Shared client for all backend endpoint wrappers.
///
/// Cloning is cheap; all clones share the underlying connection pool and
/// the bearer token slot, so a login performed through one clone is visible
/// to every other.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_root: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Creates a client from the application configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| SparrowError::config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_root: config.api_root(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Sets or clears the bearer token used for subsequent requests.
    pub async fn set_token(&self, token: Option<String>) {
        let mut slot = self.token.write().await;
        *slot = token;
    }

    /// Whether a bearer token is currently held.
    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Backend base URL without the API prefix (for unversioned routes).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a path onto the versioned API root.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    /// GET a JSON resource under the API root.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.client.get(self.url(path));
        let response = self.authorize(request).await.send().await?;
        Self::decode(response).await
    }

    /// GET a JSON resource with query parameters.
    pub async fn get_json_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let request = self.client.get(self.url(path)).query(query);
        let response = self.authorize(request).await.send().await?;
        Self::decode(response).await
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.authorize(request).await.send().await?;
        Self::decode(response).await
    }

    /// PUT a JSON body and decode the JSON response.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.put(self.url(path)).json(body);
        let response = self.authorize(request).await.send().await?;
        Self::decode(response).await
    }

    /// POST with no response body expected.
    pub async fn post_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.authorize(request).await.send().await?;
        Self::check(response).await.map(|_| ())
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self.client.delete(self.url(path));
        let response = self.authorize(request).await.send().await?;
        Self::check(response).await.map(|_| ())
    }

    /// POST a JSON body and return the raw response for streaming.
    pub async fn post_stream<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        let request = self
            .client
            .post(self.url(path))
            .header("Accept", "text/event-stream")
            // Streams outlive the per-request JSON timeout.
            .timeout(Duration::from_secs(600))
            .json(body);
        let response = self.authorize(request).await.send().await?;
        Self::check(response).await
    }

    /// GET against an unversioned path on the base URL (health probe).
    pub async fn get_unversioned<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        response.json::<T>().await.map_err(|err| {
            SparrowError::Serialization {
                format: "JSON".to_string(),
                message: format!("failed to parse backend response: {err}"),
            }
        })
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = parse_retry_after(response.headers().get("retry-after"));
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error body".to_string());
        Err(map_http_error(status, body, retry_after))
    }
}

/// Error body shapes the backend is known to emit.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Maps a non-2xx response onto the shared error taxonomy.
pub(crate) fn map_http_error(
    status: StatusCode,
    body: String,
    retry_after: Option<Duration>,
) -> SparrowError {
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.detail))
        .unwrap_or_else(|| body.clone());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SparrowError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => SparrowError::RateLimited {
            message,
            retry_after: retry_after.map(|delay| delay.as_secs()),
        },
        _ => SparrowError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

pub(crate) fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // Retry-After HTTP-date parsing is omitted for simplicity
    None
}
