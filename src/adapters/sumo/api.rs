//! Search job API operations
//!
//! [`SearchApi`] is the seam between the job state machine and the network.
//! [`SumoSearchApi`] implements it over [`HttpTransport`]; tests substitute
//! scripted implementations.

use super::models::MessagesResponse;
use super::transport::{HttpTransport, RawResponse};
use crate::config::SearchConfig;
use crate::domain::{JobHandle, JobId, MessagePage, SearchError, SearchJobRequest};
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use std::time::Duration;

/// Remote search job protocol
///
/// Each method maps to one HTTP call. Implementations must not retry.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Creates a job; succeeds only on `202 Accepted`
    async fn create_job(&self, request: &SearchJobRequest) -> Result<JobHandle, SearchError>;

    /// Fetches current state and counts of a job
    async fn job_status(&self, id: &JobId) -> Result<JobHandle, SearchError>;

    /// Fetches up to `limit` messages starting at `offset`
    async fn messages(
        &self,
        id: &JobId,
        limit: usize,
        offset: u64,
    ) -> Result<MessagePage, SearchError>;

    /// Releases a job on the service
    async fn delete_job(&self, id: &JobId) -> Result<(), SearchError>;

    /// Base endpoint, for logging
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: SearchApi + ?Sized> SearchApi for std::sync::Arc<T> {
    async fn create_job(&self, request: &SearchJobRequest) -> Result<JobHandle, SearchError> {
        (**self).create_job(request).await
    }

    async fn job_status(&self, id: &JobId) -> Result<JobHandle, SearchError> {
        (**self).job_status(id).await
    }

    async fn messages(
        &self,
        id: &JobId,
        limit: usize,
        offset: u64,
    ) -> Result<MessagePage, SearchError> {
        (**self).messages(id, limit, offset).await
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), SearchError> {
        (**self).delete_job(id).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// [`SearchApi`] over HTTP
#[derive(Debug, Clone)]
pub struct SumoSearchApi {
    endpoint: String,
    transport: HttpTransport,
}

impl SumoSearchApi {
    /// Creates a client for `endpoint` (the jobs collection URL)
    pub fn new(endpoint: impl Into<String>, transport: HttpTransport) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            endpoint,
            transport,
        }
    }

    /// Creates a client with its own transport from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let transport = HttpTransport::new(
            config.access_id.expose_secret().as_ref(),
            config.access_key.expose_secret().as_ref(),
            Duration::from_secs(config.timeout_seconds),
        )?;
        Ok(Self::new(config.api_url.clone(), transport))
    }

    fn job_url(&self, id: &JobId) -> String {
        format!("{}/{}", self.endpoint, id)
    }
}

fn expect_status(
    response: &RawResponse,
    expected: StatusCode,
    operation: &'static str,
) -> Result<(), SearchError> {
    if response.status == expected {
        Ok(())
    } else {
        tracing::debug!(
            operation = operation,
            status = %response.status,
            body = %response.body,
            "Unexpected search API status"
        );
        Err(SearchError::protocol(operation, response.status_line()))
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: &RawResponse) -> Result<T, SearchError> {
    serde_json::from_str(&response.body).map_err(|e| SearchError::Decode(e.to_string()))
}

#[async_trait]
impl SearchApi for SumoSearchApi {
    async fn create_job(&self, request: &SearchJobRequest) -> Result<JobHandle, SearchError> {
        let body = serde_json::to_string(request)
            .map_err(|e| SearchError::Decode(format!("Could not encode search request: {e}")))?;

        let response = self.transport.post(&self.endpoint, body).await?;
        expect_status(&response, StatusCode::ACCEPTED, "submit search job")?;
        decode(&response)
    }

    async fn job_status(&self, id: &JobId) -> Result<JobHandle, SearchError> {
        let response = self.transport.get(&self.job_url(id), &[]).await?;
        expect_status(&response, StatusCode::OK, "refresh search job")?;
        decode(&response)
    }

    async fn messages(
        &self,
        id: &JobId,
        limit: usize,
        offset: u64,
    ) -> Result<MessagePage, SearchError> {
        let url = format!("{}/messages", self.job_url(id));
        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];

        let response = self.transport.get(&url, &query).await?;
        expect_status(&response, StatusCode::OK, "fetch search job messages")?;
        Ok(decode::<MessagesResponse>(&response)?.into_page())
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), SearchError> {
        let response = self.transport.delete(&self.job_url(id)).await?;
        expect_status(&response, StatusCode::OK, "delete search job")
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobStatus;
    use mockito::Matcher;

    fn api(server: &mockito::Server) -> SumoSearchApi {
        let transport = HttpTransport::new("id", "key", Duration::from_secs(5)).unwrap();
        SumoSearchApi::new(format!("{}/api/v1/search/jobs/", server.url()), transport)
    }

    fn request() -> SearchJobRequest {
        SearchJobRequest::new(
            "_sourceCategory=prod",
            "2021-01-01T00:00:00",
            "2021-01-02T00:00:00",
            "UTC",
        )
    }

    #[tokio::test]
    async fn test_create_job_sends_query_definition() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/search/jobs")
            .match_body(Matcher::Json(serde_json::json!({
                "query": "_sourceCategory=prod",
                "from": "2021-01-01T00:00:00",
                "to": "2021-01-02T00:00:00",
                "timeZone": "UTC"
            })))
            .with_status(202)
            .with_body(r#"{"id":"ABC","state":"NOT STARTED","messageCount":0,"recordCount":0}"#)
            .create_async()
            .await;

        let handle = api(&server).create_job(&request()).await.unwrap();

        assert_eq!(handle.id.as_str(), "ABC");
        assert_eq!(handle.state, JobStatus::NotStarted);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_job_rejects_200() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/search/jobs")
            .with_status(200)
            .with_body(r#"{"id":"ABC"}"#)
            .create_async()
            .await;

        let err = api(&server).create_job(&request()).await.unwrap_err();

        match err {
            SearchError::Protocol { status, .. } => assert_eq!(status, "200 OK"),
            other => panic!("Expected protocol error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_job_bad_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/search/jobs")
            .with_status(202)
            .with_body("not json")
            .create_async()
            .await;

        let err = api(&server).create_job(&request()).await.unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_create_job_blank_id_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/search/jobs")
            .with_status(202)
            .with_body(r#"{"id":"  ","state":"NOT STARTED"}"#)
            .create_async()
            .await;

        let err = api(&server).create_job(&request()).await.unwrap_err();
        match err {
            SearchError::Decode(msg) => assert!(msg.contains("Job ID cannot be empty")),
            other => panic!("Expected decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_job_status_reports_counts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/search/jobs/ABC")
            .with_status(200)
            .with_body(
                r#"{"id":"ABC","state":"DONE GATHERING RESULTS","messageCount":42,"recordCount":0}"#,
            )
            .create_async()
            .await;

        let id = JobId::new("ABC").unwrap();
        let handle = api(&server).job_status(&id).await.unwrap();

        assert!(handle.state.is_done_gathering());
        assert_eq!(handle.message_count, 42);
    }

    #[tokio::test]
    async fn test_job_status_not_found_carries_status_line() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/search/jobs/ABC")
            .with_status(404)
            .create_async()
            .await;

        let id = JobId::new("ABC").unwrap();
        let err = api(&server).job_status(&id).await.unwrap_err();
        assert!(err.to_string().contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_messages_passes_limit_and_offset() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/search/jobs/ABC/messages")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "2".into()),
                Matcher::UrlEncoded("offset".into(), "4".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"messages":[{"map":{"_raw":"a","_sourcehost":"h","_source":"s","_messagetime":"1"}}]}"#,
            )
            .create_async()
            .await;

        let id = JobId::new("ABC").unwrap();
        let page = api(&server).messages(&id, 2, 4).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].raw, "a");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_job_requires_200() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/api/v1/search/jobs/ABC")
            .with_status(204)
            .create_async()
            .await;

        let id = JobId::new("ABC").unwrap();
        let err = api(&server).delete_job(&id).await.unwrap_err();
        assert!(matches!(err, SearchError::Protocol { .. }));
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let transport = HttpTransport::new("id", "key", Duration::from_secs(5)).unwrap();
        let api = SumoSearchApi::new("https://example.com/jobs/", transport);
        assert_eq!(api.endpoint(), "https://example.com/jobs");
        assert_eq!(
            api.job_url(&JobId::new("X").unwrap()),
            "https://example.com/jobs/X"
        );
    }
}
