//! Search job domain types
//!
//! The query definition sent to the service, the handle describing a running
//! job, and the destination a finished export is shipped to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier the service assigns to a search job
///
/// # Examples
///
/// ```
/// use sumo_export::domain::job::JobId;
/// use std::str::FromStr;
///
/// let id = JobId::from_str("4A5B6C7D8E9F").unwrap();
/// assert_eq!(id.as_str(), "4A5B6C7D8E9F");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct JobId(String);

impl JobId {
    /// Creates a new JobId, rejecting blank identifiers
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Job ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the job ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for JobId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for JobId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Immutable query definition for one search job
///
/// Serialized as the body of the job creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchJobRequest {
    /// Query statement
    pub query: String,

    /// Start of the time range (`YYYY-MM-DDTHH:MM:SS`, no offset)
    pub from: String,

    /// End of the time range (`YYYY-MM-DDTHH:MM:SS`, no offset)
    pub to: String,

    /// Time zone the range is interpreted in
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

impl SearchJobRequest {
    /// Creates a new request
    pub fn new(
        query: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            from: from.into(),
            to: to.into(),
            time_zone: time_zone.into(),
        }
    }
}

/// Remote lifecycle state of a search job
///
/// Unrecognized state strings decode to [`JobStatus::Unknown`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "NOT STARTED")]
    NotStarted,

    #[serde(rename = "GATHERING RESULTS")]
    GatheringResults,

    #[serde(rename = "GATHERING RESULTS FROM SUBQUERIES")]
    GatheringResultsFromSubqueries,

    #[serde(rename = "FORCE PAUSED")]
    ForcePaused,

    #[serde(rename = "DONE GATHERING RESULTS")]
    DoneGatheringResults,

    #[serde(rename = "CANCELLED")]
    Cancelled,

    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// True once result counts are final
    pub fn is_done_gathering(self) -> bool {
        matches!(self, JobStatus::DoneGatheringResults)
    }

    /// True while the service is still adding results
    pub fn is_gathering(self) -> bool {
        matches!(
            self,
            JobStatus::GatheringResults | JobStatus::GatheringResultsFromSubqueries
        )
    }

    pub fn is_cancelled(self) -> bool {
        matches!(self, JobStatus::Cancelled)
    }

    /// Wire representation of the status
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::NotStarted => "NOT STARTED",
            JobStatus::GatheringResults => "GATHERING RESULTS",
            JobStatus::GatheringResultsFromSubqueries => "GATHERING RESULTS FROM SUBQUERIES",
            JobStatus::ForcePaused => "FORCE PAUSED",
            JobStatus::DoneGatheringResults => "DONE GATHERING RESULTS",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a running remote job and its advertised counts
///
/// `message_count` is the authoritative pagination target. It may grow while
/// the job is still gathering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: JobId,

    #[serde(default)]
    pub state: JobStatus,

    #[serde(rename = "messageCount", default)]
    pub message_count: u64,

    #[serde(rename = "recordCount", default)]
    pub record_count: u64,
}

impl JobHandle {
    pub fn new(id: JobId, state: JobStatus, message_count: u64, record_count: u64) -> Self {
        Self {
            id,
            state,
            message_count,
            record_count,
        }
    }
}

/// Remote bucket an export artifact is shipped to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkDestination {
    pub bucket: String,
    pub region: String,

    /// Remove the local artifact once the transfer succeeded
    pub delete_on_upload: bool,
}

impl SinkDestination {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            delete_on_upload: false,
        }
    }

    pub fn with_delete_on_upload(mut self, delete_on_upload: bool) -> Self {
        self.delete_on_upload = delete_on_upload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_rejects_blank() {
        assert!(JobId::new("  ").is_err());
        assert_eq!(JobId::new("ABC").unwrap().to_string(), "ABC");
    }

    #[test]
    fn test_handle_with_blank_id_is_rejected() {
        let result =
            serde_json::from_str::<JobHandle>(r#"{"id":"  ","state":"NOT STARTED"}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<JobHandle>(r#"{"id":"","state":"NOT STARTED"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_serializes_time_zone_in_camel_case() {
        let request = SearchJobRequest::new(
            "error",
            "2021-01-01T00:00:00",
            "2021-01-02T00:00:00",
            "UTC",
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["timeZone"], "UTC");
        assert_eq!(json["query"], "error");
        assert!(json.get("time_zone").is_none());
    }

    #[test]
    fn test_handle_decodes_service_shape() {
        let handle: JobHandle = serde_json::from_str(
            r#"{"id":"ABC","state":"GATHERING RESULTS","messageCount":12,"recordCount":3}"#,
        )
        .unwrap();
        assert_eq!(handle.id.as_str(), "ABC");
        assert_eq!(handle.state, JobStatus::GatheringResults);
        assert_eq!(handle.message_count, 12);
        assert_eq!(handle.record_count, 3);
    }

    #[test]
    fn test_handle_decodes_id_only() {
        let handle: JobHandle =
            serde_json::from_str(r#"{"id":"ABC","link":{"rel":"self"}}"#).unwrap();
        assert_eq!(handle.state, JobStatus::NotStarted);
        assert_eq!(handle.message_count, 0);
    }

    #[test]
    fn test_unknown_status_does_not_fail() {
        let status: JobStatus = serde_json::from_str(r#""SOMETHING NEW""#).unwrap();
        assert_eq!(status, JobStatus::Unknown);
        assert!(!status.is_done_gathering());
    }

    #[test]
    fn test_status_predicates() {
        assert!(JobStatus::DoneGatheringResults.is_done_gathering());
        assert!(JobStatus::GatheringResults.is_gathering());
        assert!(JobStatus::GatheringResultsFromSubqueries.is_gathering());
        assert!(JobStatus::Cancelled.is_cancelled());
        assert!(!JobStatus::ForcePaused.is_done_gathering());
    }

    #[test]
    fn test_status_round_trips_wire_string() {
        for status in [
            JobStatus::NotStarted,
            JobStatus::GatheringResults,
            JobStatus::DoneGatheringResults,
            JobStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
