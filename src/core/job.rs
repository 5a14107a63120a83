//! Search job state machine
//!
//! A [`SearchJob`] owns one remote job from submission to deletion:
//!
//! ```text
//! Created -> Submitted -> Polling <-> Gathering -> Complete
//!                 \___________\__________\____________\____-> Deleted
//! any phase -> Failed
//! ```
//!
//! Operations invoked out of order fail with [`SearchError::Precondition`]
//! without touching the network.

use crate::adapters::sumo::SearchApi;
use crate::domain::{JobHandle, JobId, JobStatus, MessagePage, SearchError, SearchJobRequest};
use std::fmt;

/// Local lifecycle phase of a [`SearchJob`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Created,
    Submitted,
    /// Refreshed; remote not started or paused
    Polling,
    Gathering,
    Complete,
    Deleted,
    Failed,
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobPhase::Created => "created",
            JobPhase::Submitted => "submitted",
            JobPhase::Polling => "polling",
            JobPhase::Gathering => "gathering",
            JobPhase::Complete => "complete",
            JobPhase::Deleted => "deleted",
            JobPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

impl JobPhase {
    fn after_status(status: JobStatus) -> Self {
        if status.is_done_gathering() {
            JobPhase::Complete
        } else if status.is_gathering() {
            JobPhase::Gathering
        } else {
            JobPhase::Polling
        }
    }
}

/// One remote search job
///
/// A failed job keeps its handle so it can still be deleted.
#[derive(Debug)]
pub struct SearchJob<A: SearchApi> {
    api: A,
    request: SearchJobRequest,
    handle: Option<JobHandle>,
    phase: JobPhase,
    delete_attempted: bool,
}

impl<A: SearchApi> SearchJob<A> {
    pub fn new(api: A, request: SearchJobRequest) -> Self {
        Self {
            api,
            request,
            handle: None,
            phase: JobPhase::Created,
            delete_attempted: false,
        }
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn request(&self) -> &SearchJobRequest {
        &self.request
    }

    pub fn handle(&self) -> Option<&JobHandle> {
        self.handle.as_ref()
    }

    pub fn id(&self) -> Option<&JobId> {
        self.handle.as_ref().map(|h| &h.id)
    }

    /// Advertised message count, zero before submission
    pub fn message_count(&self) -> u64 {
        self.handle.as_ref().map_or(0, |h| h.message_count)
    }

    /// True if a remote job exists that has not been deleted yet
    pub fn needs_cleanup(&self) -> bool {
        self.handle.is_some() && !self.delete_attempted
    }

    /// Creates the remote job
    ///
    /// # Errors
    ///
    /// [`SearchError::Precondition`] if called more than once; otherwise the
    /// transport error. Only `202 Accepted` counts as success.
    pub async fn submit(&mut self) -> Result<&JobHandle, SearchError> {
        if self.phase != JobPhase::Created {
            return Err(SearchError::Precondition(format!(
                "job cannot be submitted in phase {}",
                self.phase
            )));
        }

        match self.api.create_job(&self.request).await {
            Ok(handle) => {
                tracing::info!(
                    job_id = %handle.id,
                    from = %self.request.from,
                    to = %self.request.to,
                    "Search job submitted"
                );
                self.phase = JobPhase::Submitted;
                Ok(&*self.handle.insert(handle))
            }
            Err(e) => {
                self.phase = JobPhase::Failed;
                Err(e)
            }
        }
    }

    /// Re-reads the job state and counts
    pub async fn refresh_status(&mut self) -> Result<&JobHandle, SearchError> {
        let id = self.live_id("refresh")?;

        match self.api.job_status(&id).await {
            Ok(latest) => {
                let phase = JobPhase::after_status(latest.state);
                let handle = self
                    .handle
                    .as_mut()
                    .ok_or_else(|| SearchError::Precondition("job has no handle".to_string()))?;
                handle.state = latest.state;
                handle.message_count = latest.message_count;
                handle.record_count = latest.record_count;
                self.phase = phase;

                tracing::debug!(
                    job_id = %handle.id,
                    state = %handle.state,
                    message_count = handle.message_count,
                    "Search job status refreshed"
                );
                Ok(&*handle)
            }
            Err(e) => {
                self.phase = JobPhase::Failed;
                Err(e)
            }
        }
    }

    /// Fetches up to `limit` messages starting at `offset`
    pub async fn fetch_page(&mut self, limit: usize, offset: u64) -> Result<MessagePage, SearchError> {
        let id = self.live_id("fetch messages for")?;

        self.api.messages(&id, limit, offset).await.inspect_err(|_| {
            self.phase = JobPhase::Failed;
        })
    }

    /// Deletes the remote job
    ///
    /// Allowed once per submission; a second call is a precondition error
    /// even if the first one failed.
    pub async fn delete(&mut self) -> Result<(), SearchError> {
        let id = self.live_id("delete")?;
        self.delete_attempted = true;

        match self.api.delete_job(&id).await {
            Ok(()) => {
                tracing::debug!(job_id = %id, "Search job deleted");
                self.phase = JobPhase::Deleted;
                Ok(())
            }
            Err(e) => {
                self.phase = JobPhase::Failed;
                Err(e)
            }
        }
    }

    fn live_id(&self, action: &str) -> Result<JobId, SearchError> {
        if self.delete_attempted {
            return Err(SearchError::Precondition(format!(
                "cannot {action} a deleted job"
            )));
        }
        self.handle.as_ref().map(|h| h.id.clone()).ok_or_else(|| {
            SearchError::Precondition(format!("cannot {action} a job that was never submitted"))
        })
    }
}
