//! Authenticated HTTP transport for the search job API
//!
//! Sends POST/GET/DELETE requests carrying a fixed `Basic` credential header
//! and `Content-Type: application/json`, and hands back the raw status and
//! body. Interpreting status codes is left to the caller.

use crate::domain::SearchError;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use std::time::Duration;

/// Raw response: status plus undecoded body
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// Status line in `"<code> <reason>"` form, e.g. `"202 Accepted"`
    pub fn status_line(&self) -> String {
        self.status.to_string()
    }
}

/// Builds the `Basic base64(id:key)` authorization value
pub fn basic_auth_value(access_id: &str, access_key: &str) -> String {
    let encoded = general_purpose::STANDARD.encode(format!("{access_id}:{access_key}"));
    format!("Basic {encoded}")
}

/// HTTP transport bound to one credential pair
///
/// Every instance owns its own connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose requests all carry the given credentials
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Connection`] if the credentials are not a valid
    /// header value or the HTTP client cannot be built.
    pub fn new(access_id: &str, access_key: &str, timeout: Duration) -> Result<Self, SearchError> {
        let mut auth = HeaderValue::from_str(&basic_auth_value(access_id, access_key))
            .map_err(|e| SearchError::Connection(format!("Invalid credentials header: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SearchError::Connection(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    pub async fn post(&self, url: &str, body: String) -> Result<RawResponse, SearchError> {
        self.send(self.client.post(url).body(body), Method::POST, url)
            .await
    }

    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse, SearchError> {
        self.send(self.client.get(url).query(query), Method::GET, url)
            .await
    }

    pub async fn delete(&self, url: &str) -> Result<RawResponse, SearchError> {
        self.send(self.client.delete(url), Method::DELETE, url)
            .await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        method: Method,
        url: &str,
    ) -> Result<RawResponse, SearchError> {
        tracing::trace!(method = %method, url = %url, "Sending search API request");

        let response = request.send().await.map_err(|e| {
            SearchError::Connection(format!("Unable to execute HTTP {method} request: {e}"))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SearchError::Connection(format!("Unable to read HTTP {method} response body: {e}"))
        })?;

        tracing::trace!(method = %method, url = %url, status = %status, "Search API responded");

        Ok(RawResponse { status, body })
    }
}
