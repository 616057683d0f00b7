//! reqwest client for the world API.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::infrastructure::ports::ApiError;

/// Default world API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Default per-request timeout.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials attached to every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ApiAuth {
    #[default]
    None,
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// A raw key in a custom header, `X-API-Key` unless configured otherwise.
    ApiKey { header: String, key: String },
}

impl ApiAuth {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey {
            header: "X-API-Key".to_string(),
            key: key.into(),
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::None => request,
            Self::Bearer(token) => request.bearer_auth(token),
            Self::ApiKey { header, key } => request.header(header.as_str(), key.as_str()),
        }
    }
}

/// Client for the world API's JSON endpoints.
///
/// Every port trait in [`crate::infrastructure::ports`] that talks to the API
/// is implemented on this one type.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    auth: ApiAuth,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                timeout_ms = timeout.as_millis() as u64,
                "HTTP client build failed; requests will run without a timeout"
            );
            Client::new()
        });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: ApiAuth::None,
        }
    }

    pub fn with_auth(mut self, auth: ApiAuth) -> Self {
        self.auth = auth;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url + path`, with `segment` appended percent-encoded.
    pub(crate) fn url_with_segment(&self, path: &str, segment: &str) -> Result<String, ApiError> {
        let base = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&base).map_err(|e| ApiError::request(&base, e))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::request(&base, "base URL cannot carry a path"))?
            .push(segment);
        Ok(url.into())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET that maps 404 to `Ok(None)`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, ApiError> {
        let (status, body) = self.send(self.client.get(url), "GET", url).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        ensure_success(url, status, &body)?;
        decode(url, &body).map(Some)
    }

    /// POST a JSON body and decode the JSON response.
    pub(crate) async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, response) = self.send(self.client.post(url).json(body), "POST", url).await?;
        ensure_success(url, status, &response)?;
        decode(url, &response)
    }

    /// POST where an empty success body means "nothing returned".
    pub(crate) async fn post_optional<B, T>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Option<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, response) = self.send(self.client.post(url).json(body), "POST", url).await?;
        ensure_success(url, status, &response)?;
        if response.trim().is_empty() {
            return Ok(None);
        }
        decode(url, &response).map(Some)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &str,
    ) -> Result<(StatusCode, String), ApiError> {
        let started = Instant::now();
        let response = self
            .auth
            .apply(request)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(url, e))?;

        tracing::debug!(
            method,
            url,
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "API response"
        );
        Ok((status, body))
    }
}

impl Default for HttpApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT)
    }
}

fn ensure_success(url: &str, status: StatusCode, body: &str) -> Result<(), ApiError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::status(url, status.as_u16(), body))
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::decode(url, "empty response body"));
    }
    serde_json::from_str(body).map_err(|e| ApiError::decode(url, e))
}

/// Classify a transport failure. Timeouts and connect failures are transient.
fn transport_error(url: &str, e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::timeout(url)
    } else if e.is_connect() {
        ApiError::connection(url, e)
    } else if e.is_decode() || e.is_body() {
        ApiError::decode(url, e)
    } else {
        ApiError::request(url, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = HttpApiClient::new("http://api.local/api/", DEFAULT_API_TIMEOUT);
        assert_eq!(client.base_url(), "http://api.local/api");
        assert_eq!(client.url("/Towns/search"), "http://api.local/api/Towns/search");
    }

    #[test]
    fn path_segments_are_encoded() {
        let client = HttpApiClient::new("http://api.local/api", DEFAULT_API_TIMEOUT);
        let url = client
            .url_with_segment("/Domains/by-region", "spawn area/1")
            .expect("valid url");
        assert_eq!(url, "http://api.local/api/Domains/by-region/spawn%20area%2F1");
    }

    #[test]
    fn blank_body_is_a_decode_error() {
        let err = decode::<serde_json::Value>("http://api.local/health", "  ").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn non_success_status_keeps_body() {
        let err = ensure_success("http://api.local/x", StatusCode::BAD_GATEWAY, "upstream down")
            .unwrap_err();
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.diagnostic().snippet, "upstream down");
    }
}
