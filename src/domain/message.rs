//! Log message records returned by a search job

use serde::{Deserialize, Serialize};

/// One raw log record from a search job result page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Message timestamp (epoch millis as sent by the service)
    #[serde(rename = "_messagetime", default)]
    pub message_time: String,

    #[serde(rename = "_sourcehost", default)]
    pub source_host: String,

    #[serde(rename = "_source", default)]
    pub source: String,

    /// Raw log line
    #[serde(rename = "_raw", default)]
    pub raw: String,
}

impl MessageRecord {
    /// Row written to the CSV sink: log line, source host, source
    pub fn csv_row(&self) -> [&str; 3] {
        [&self.raw, &self.source_host, &self.source]
    }
}

/// Ordered records from one paginated fetch
pub type MessagePage = Vec<MessageRecord>;

/// Header written once at the top of every export artifact
pub const CSV_HEADER: [&str; 3] = ["message", "sourcehost", "source"];
