//! Domain models and types for sumo-export.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Search job types** ([`SearchJobRequest`], [`JobHandle`], [`JobStatus`], [`JobId`])
//! - **Result records** ([`MessageRecord`], [`MessagePage`])
//! - **Upload destination** ([`SinkDestination`])
//! - **Error types** ([`ExportError`], [`SearchError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ExportError>`]:
//!
//! ```rust
//! use sumo_export::domain::{ExportError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(ExportError::Validation("page size must be positive".to_string()))
//! }
//! ```

pub mod context;
pub mod errors;
pub mod job;
pub mod message;
pub mod result;

pub use errors::{ExportError, SearchError};
pub use job::{JobHandle, JobId, JobStatus, SearchJobRequest, SinkDestination};
pub use message::{MessagePage, MessageRecord, CSV_HEADER};
pub use result::Result;
