//! In-memory object store
//!
//! Keeps objects in a map and records multipart activity so uploads can be
//! inspected without a network. Used by the test suites and by local runs
//! that want to exercise the upload path without credentials.

use super::traits::{CompletedPart, ObjectStore};
use crate::domain::{ExportError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    /// Number of parts the object was assembled from (1 for a single put)
    pub parts: usize,
}

#[derive(Debug)]
struct PendingUpload {
    key: String,
    content_type: String,
    parts: BTreeMap<i32, Vec<u8>>,
}

#[derive(Debug, Default)]
struct State {
    objects: HashMap<String, StoredObject>,
    pending: HashMap<String, PendingUpload>,
    aborted: Vec<String>,
    next_upload: usize,
}

/// [`super::ObjectStore`] backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    bucket: String,
    state: Mutex<State>,
    fail_part: Option<i32>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Makes every upload of `part_number` fail
    pub fn failing_part(mut self, part_number: i32) -> Self {
        self.fail_part = Some(part_number);
        self
    }

    /// Returns a copy of the object stored under `key`
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.lock().ok()?.objects.get(key).cloned()
    }

    /// Keys of all stored objects, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .map(|s| s.objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Keys whose multipart uploads were aborted
    pub fn aborted(&self) -> Vec<String> {
        self.lock().map(|s| s.aborted.clone()).unwrap_or_default()
    }

    /// Number of multipart uploads neither completed nor aborted
    pub fn pending_uploads(&self) -> usize {
        self.lock().map(|s| s.pending.len()).unwrap_or_default()
    }

    /// Largest number of `upload_part` calls observed running at once
    pub fn peak_parts_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| ExportError::Other("in-memory object store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.lock()?.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                parts: 1,
            },
        );
        Ok(())
    }

    async fn create_multipart_upload(&self, key: &str, content_type: &str) -> Result<String> {
        let mut state = self.lock()?;
        state.next_upload += 1;
        let upload_id = format!("upload-{}", state.next_upload);
        state.pending.insert(
            upload_id.clone(),
            PendingUpload {
                key: key.to_string(),
                content_type: content_type.to_string(),
                parts: BTreeMap::new(),
            },
        );
        Ok(upload_id)
    }

    async fn upload_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Vec<u8>,
    ) -> Result<CompletedPart> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        // Let sibling part futures interleave so concurrency is observable.
        tokio::task::yield_now().await;

        let result = if self.fail_part == Some(part_number) {
            Err(ExportError::Transfer(format!(
                "UploadPart failed for {key}: part {part_number} rejected"
            )))
        } else {
            self.lock().and_then(|mut state| {
                let pending = state.pending.get_mut(upload_id).ok_or_else(|| {
                    ExportError::Transfer(format!("Unknown upload ID {upload_id}"))
                })?;
                pending.parts.insert(part_number, body);
                Ok(CompletedPart {
                    part_number,
                    e_tag: format!("\"etag-{part_number}\""),
                })
            })
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<()> {
        let mut state = self.lock()?;
        let pending = state
            .pending
            .remove(upload_id)
            .ok_or_else(|| ExportError::Transfer(format!("Unknown upload ID {upload_id}")))?;

        if pending.key != key || parts.len() != pending.parts.len() {
            return Err(ExportError::Transfer(format!(
                "CompleteMultipartUpload failed for {key}: part list does not match upload"
            )));
        }

        let ordered = parts.windows(2).all(|w| w[0].part_number < w[1].part_number);
        if !ordered {
            return Err(ExportError::Transfer(format!(
                "CompleteMultipartUpload failed for {key}: parts out of order"
            )));
        }

        let count = pending.parts.len();
        let body = pending.parts.into_values().flatten().collect();
        state.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: pending.content_type,
                parts: count,
            },
        );
        Ok(())
    }

    async fn abort_multipart_upload(&self, key: &str, upload_id: &str) -> Result<()> {
        let mut state = self.lock()?;
        state.pending.remove(upload_id);
        state.aborted.push(key.to_string());
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("memory://{}/{}", self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_read_back() {
        let store = InMemoryObjectStore::new("bucket");
        store
            .put_object("a.csv", b"x,y\n".to_vec(), "text/csv")
            .await
            .unwrap();

        let object = store.object("a.csv").unwrap();
        assert_eq!(object.body, b"x,y\n");
        assert_eq!(object.content_type, "text/csv");
        assert_eq!(store.location("a.csv"), "memory://bucket/a.csv");
    }

    #[tokio::test]
    async fn test_multipart_assembles_in_part_order() {
        let store = InMemoryObjectStore::new("bucket");
        let id = store.create_multipart_upload("b.csv", "text/csv").await.unwrap();

        let p2 = store.upload_part("b.csv", &id, 2, b"world".to_vec()).await.unwrap();
        let p1 = store.upload_part("b.csv", &id, 1, b"hello ".to_vec()).await.unwrap();
        store
            .complete_multipart_upload("b.csv", &id, vec![p1, p2])
            .await
            .unwrap();

        let object = store.object("b.csv").unwrap();
        assert_eq!(object.body, b"hello world");
        assert_eq!(object.parts, 2);
        assert_eq!(store.pending_uploads(), 0);
    }

    #[tokio::test]
    async fn test_failing_part_and_abort() {
        let store = InMemoryObjectStore::new("bucket").failing_part(1);
        let id = store.create_multipart_upload("c.csv", "text/csv").await.unwrap();

        let err = store.upload_part("c.csv", &id, 1, vec![0]).await.unwrap_err();
        assert!(matches!(err, ExportError::Transfer(_)));

        store.abort_multipart_upload("c.csv", &id).await.unwrap();
        assert_eq!(store.aborted(), vec!["c.csv".to_string()]);
        assert!(store.object("c.csv").is_none());
    }
}
