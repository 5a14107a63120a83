//! Upload of finished CSV files to an object store
//!
//! Small files go up in one request. Files larger than the part size are sent
//! as a multipart upload whose parts are read from disk lazily, with at most
//! `part_concurrency` parts in flight at a time.

use crate::adapters::storage::{CompletedPart, ObjectStore};
use crate::config::S3Config;
use crate::domain::context::ResultExt;
use crate::domain::{ExportError, Result, SinkDestination};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub key: String,
    pub location: String,
    pub bytes: u64,
    /// 1 for a single-request upload
    pub parts: usize,
    pub local_deleted: bool,
    /// Set when the local file should have been removed but could not be
    pub cleanup_error: Option<String>,
}

/// Content type for a file, from its extension
pub fn detect_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => "text/csv",
        Some("txt") | Some("log") => "text/plain",
        Some("json") => "application/json",
        Some("gz") => "application/gzip",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Ships local files to an [`ObjectStore`]
#[derive(Clone)]
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
    part_size: usize,
    part_concurrency: usize,
}

impl Uploader {
    pub fn new(store: Arc<dyn ObjectStore>, part_size: usize, part_concurrency: usize) -> Self {
        Self {
            store,
            part_size: part_size.max(1),
            part_concurrency: part_concurrency.max(1),
        }
    }

    pub fn from_config(store: Arc<dyn ObjectStore>, config: &S3Config) -> Self {
        Self::new(store, config.part_size_bytes(), config.part_concurrency)
    }

    /// Uploads `path` under its base filename
    ///
    /// On a transfer failure the local file is left in place. A failure to
    /// delete the local file after a successful upload is reported in
    /// [`UploadOutcome::cleanup_error`] rather than as an error.
    pub async fn upload(&self, path: &Path, destination: &SinkDestination) -> Result<UploadOutcome> {
        let key = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ExportError::Validation(format!("{} has no usable file name", path.display()))
            })?;
        let content_type = detect_content_type(path);

        let bytes = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len();

        tracing::info!(
            file = %path.display(),
            bucket = %destination.bucket,
            key = %key,
            bytes = bytes,
            "Uploading export"
        );

        let parts = if bytes <= self.part_size as u64 {
            let body = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            self.store.put_object(&key, body, content_type).await?;
            1
        } else {
            self.upload_multipart(path, &key, content_type, bytes).await?
        };

        let location = self.store.location(&key);
        tracing::info!(key = %key, location = %location, parts = parts, "Upload complete");

        let mut outcome = UploadOutcome {
            key,
            location,
            bytes,
            parts,
            local_deleted: false,
            cleanup_error: None,
        };

        if destination.delete_on_upload {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {
                    tracing::debug!(file = %path.display(), "Removed local export after upload");
                    outcome.local_deleted = true;
                }
                Err(e) => {
                    tracing::warn!(
                        file = %path.display(),
                        error = %e,
                        "Failed to remove local export after upload"
                    );
                    outcome.cleanup_error = Some(e.to_string());
                }
            }
        }

        Ok(outcome)
    }

    async fn upload_multipart(
        &self,
        path: &Path,
        key: &str,
        content_type: &str,
        bytes: u64,
    ) -> Result<usize> {
        let part_size = self.part_size as u64;
        let part_count = bytes.div_ceil(part_size);
        let upload_id = self.store.create_multipart_upload(key, content_type).await?;

        tracing::debug!(
            key = %key,
            upload_id = %upload_id,
            part_count = part_count,
            concurrency = self.part_concurrency,
            "Multipart upload started"
        );

        let uploaded: Result<Vec<CompletedPart>> = stream::iter(0..part_count)
            .map(|index| {
                let store = self.store.clone();
                let path = path.to_path_buf();
                let key = key.to_string();
                let upload_id = upload_id.clone();
                async move {
                    let offset = index * part_size;
                    let len = part_size.min(bytes - offset) as usize;
                    let body = read_chunk(&path, offset, len).await?;
                    // Part numbers are 1-based.
                    let part_number = i32::try_from(index + 1).map_err(|_| {
                        ExportError::Transfer(format!("{key} needs more parts than S3 allows"))
                    })?;
                    store.upload_part(&key, &upload_id, part_number, body).await
                }
            })
            .buffer_unordered(self.part_concurrency)
            .try_collect()
            .await;

        let mut parts = match uploaded {
            Ok(parts) => parts,
            Err(e) => {
                tracing::warn!(key = %key, upload_id = %upload_id, error = %e, "Aborting multipart upload");
                if let Err(abort) = self.store.abort_multipart_upload(key, &upload_id).await {
                    tracing::error!(key = %key, error = %abort, "Failed to abort multipart upload");
                }
                return Err(e);
            }
        };

        parts.sort_by_key(|p| p.part_number);
        let count = parts.len();
        self.store
            .complete_multipart_upload(key, &upload_id, parts)
            .await?;
        Ok(count)
    }
}

async fn read_chunk(path: &Path, offset: u64, len: usize) -> Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.seek(std::io::SeekFrom::Start(offset)).await?;
    let mut buffer = vec![0u8; len];
    file.read_exact(&mut buffer)
        .await
        .with_context(|| format!("Failed to read {len} bytes at {offset} from {}", path.display()))?;
    Ok(buffer)
}
