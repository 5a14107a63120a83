//! Object store abstraction
//!
//! This module defines the trait upload backends implement. Chunking and part
//! concurrency live in [`crate::core::upload`]; a backend only moves bytes.

use crate::domain::Result;
use async_trait::async_trait;

/// A part uploaded as part of a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPart {
    /// 1-based part number
    pub part_number: i32,

    /// Entity tag returned by the store for this part
    pub e_tag: String,
}

/// Object store client
///
/// All methods report failures as [`crate::domain::ExportError::Transfer`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `body` under `key` in a single request
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Starts a multipart upload and returns its upload ID
    async fn create_multipart_upload(&self, key: &str, content_type: &str) -> Result<String>;

    /// Uploads one part of a multipart upload
    async fn upload_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Vec<u8>,
    ) -> Result<CompletedPart>;

    /// Completes a multipart upload; `parts` are in ascending part-number order
    async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<()>;

    /// Discards the parts of an unfinished multipart upload
    async fn abort_multipart_upload(&self, key: &str, upload_id: &str) -> Result<()>;

    /// Address of `key` once stored
    fn location(&self, key: &str) -> String;
}
