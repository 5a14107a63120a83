//! Result pagination under a moving total
//!
//! The job's advertised `message_count` can grow while the job is still
//! gathering. Pages are fetched in offset order and appended to the sink; the
//! decision after each page is made by [`after_page`] and, when the job has to
//! be re-checked, by [`after_refresh`]. Both are pure so the termination rules
//! can be tested without a network.

use super::sink::CsvSink;
use crate::adapters::sumo::SearchApi;
use crate::core::job::SearchJob;
use crate::domain::{JobStatus, Result, SearchError};
use std::io::Write;
use std::time::Duration;

/// Next step after a page was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Fetch the next page without checking status
    Advance,
    /// Re-check the job before going on
    Refresh,
}

/// Next step after the job status was re-checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Advance,
    /// Still gathering; sleep one poll interval, then advance
    Wait,
    Complete,
    Cancelled,
    /// Done gathering but an empty page arrived before the total was reached
    Stalled,
}

pub fn after_page(written: u64, total: u64, page_len: usize) -> PageAction {
    if written < total && page_len > 0 {
        PageAction::Advance
    } else {
        PageAction::Refresh
    }
}

pub fn after_refresh(written: u64, total: u64, status: JobStatus, page_len: usize) -> Settle {
    if status.is_cancelled() {
        Settle::Cancelled
    } else if !status.is_done_gathering() {
        Settle::Wait
    } else if written >= total {
        Settle::Complete
    } else if page_len > 0 {
        Settle::Advance
    } else {
        Settle::Stalled
    }
}

/// Streams every message of a submitted job into `sink`
///
/// Returns the number of data rows written, which equals the job's final
/// `message_count` on success.
///
/// # Errors
///
/// Any search API error, a sink write error, [`SearchError::Cancelled`] if the
/// remote job is cancelled, or [`SearchError::Stalled`] if the job finished
/// but stopped returning rows before reaching its advertised total.
pub async fn export_all<A, W>(
    job: &mut SearchJob<A>,
    sink: &mut CsvSink<W>,
    page_size: usize,
    poll_interval: Duration,
) -> Result<u64>
where
    A: SearchApi,
    W: Write,
{
    let mut offset: u64 = 0;
    let mut written: u64 = 0;

    loop {
        let page = job.fetch_page(page_size, offset).await?;
        let page_len = page.len();
        sink.append_page(&page)?;
        written += page_len as u64;

        let total = job.message_count();
        tracing::debug!(
            job_id = ?job.id().map(|id| id.as_str()),
            offset = offset,
            page_len = page_len,
            written = written,
            total = total,
            "Page written"
        );

        if after_page(written, total, page_len) == PageAction::Advance {
            offset += page_len as u64;
            continue;
        }

        let handle = job.refresh_status().await?;
        let (total, status) = (handle.message_count, handle.state);
        match after_refresh(written, total, status, page_len) {
            Settle::Advance => offset += page_len as u64,
            Settle::Wait => {
                tracing::trace!(state = %status, total = total, "Job still gathering, waiting");
                tokio::time::sleep(poll_interval).await;
                offset += page_len as u64;
            }
            Settle::Complete => return Ok(written),
            Settle::Cancelled => {
                return Err(SearchError::Cancelled(handle.id.clone()).into());
            }
            Settle::Stalled => {
                return Err(SearchError::Stalled {
                    written,
                    expected: total,
                }
                .into());
            }
        }
    }
}
