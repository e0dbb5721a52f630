use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use striform_core::Response;
use tokio::sync::Mutex;

use super::memory::{Collections, InMemoryDocumentStore};
use super::{DocumentStore, RecordedResponse, StoreError, StoreResult};
use crate::models::FormDocument;

/// JSON-file backed store. The whole file is rewritten after each
/// mutation; reads are served from memory.
///
/// Writers hold `writer` across the change and the flush. A failed flush
/// puts memory back to what is on disk.
pub struct FileDocumentStore {
    path: PathBuf,
    inner: InMemoryDocumentStore,
    writer: Mutex<()>,
    healthy: AtomicBool,
}

impl FileDocumentStore {
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let collections = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => Collections::default(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                StoreError::Storage(format!("{} is corrupt: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::default(),
            Err(e) => return Err(StoreError::Storage(e.to_string())),
        };

        tracing::info!(
            path = %path.display(),
            forms = collections.forms.len(),
            responses = collections.responses.len(),
            "document store opened"
        );

        Ok(Self {
            path,
            inner: InMemoryDocumentStore::from_collections(collections),
            writer: Mutex::new(()),
            healthy: AtomicBool::new(true),
        })
    }

    /// Flushes the current state, or rolls memory back to `before`.
    /// Caller holds `writer`.
    async fn commit(&self, before: Collections) -> StoreResult<()> {
        match self.flush().await {
            Ok(()) => {
                self.healthy.store(true, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.inner.restore(before);
                self.healthy.store(false, Ordering::Relaxed);
                tracing::error!(path = %self.path.display(), error = %e, "flush failed, change rolled back");
                Err(e)
            }
        }
    }

    async fn flush(&self) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(&self.inner.snapshot())
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        let result: std::io::Result<()> = async {
            if let Some(dir) = self.path.parent() {
                tokio::fs::create_dir_all(dir).await?;
            }
            tokio::fs::write(&tmp, &body).await?;
            tokio::fs::rename(&tmp, &self.path).await
        }
        .await;
        result.map_err(|e| StoreError::Storage(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn list_forms(&self) -> StoreResult<Vec<FormDocument>> {
        self.inner.list_forms().await
    }

    async fn insert_form(&self, doc: FormDocument) -> StoreResult<FormDocument> {
        let _writer = self.writer.lock().await;
        let before = self.inner.snapshot();
        let doc = self.inner.insert_form(doc).await?;
        self.commit(before).await?;
        Ok(doc)
    }

    async fn find_form(&self, id: &str) -> StoreResult<Option<FormDocument>> {
        self.inner.find_form(id).await
    }

    async fn update_form(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> StoreResult<Option<FormDocument>> {
        let _writer = self.writer.lock().await;
        let before = self.inner.snapshot();
        let updated = self.inner.update_form(id, patch).await?;
        if updated.is_some() {
            self.commit(before).await?;
        }
        Ok(updated)
    }

    async fn delete_form(&self, id: &str) -> StoreResult<Option<FormDocument>> {
        let _writer = self.writer.lock().await;
        let before = self.inner.snapshot();
        let removed = self.inner.delete_form(id).await?;
        if removed.is_some() {
            self.commit(before).await?;
        }
        Ok(removed)
    }

    async fn list_responses(&self, form_id: &str) -> StoreResult<Vec<Response>> {
        self.inner.list_responses(form_id).await
    }

    async fn insert_response(&self, response: Response) -> StoreResult<RecordedResponse> {
        let _writer = self.writer.lock().await;
        let before = self.inner.snapshot();
        let recorded = self.inner.insert_response(response).await?;
        self.commit(before).await?;
        Ok(recorded)
    }

    async fn is_connected(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use striform_core::{Answers, Form};

    #[tokio::test]
    async fn test_reopen_restores_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        {
            let store = FileDocumentStore::open(&path).await.unwrap();
            let form = Form { id: "f1".into(), title: "Survey".into(), ..Default::default() };
            store.insert_form(FormDocument::new(form)).await.unwrap();
            store.insert_response(Response::complete("f1", Answers::new(), 0)).await.unwrap();
        }

        let reopened = FileDocumentStore::open(&path).await.unwrap();
        let doc = reopened.find_form("f1").await.unwrap().unwrap();
        assert_eq!(doc.form.title, "Survey");
        assert_eq!(doc.form.response_count, 1);
        assert_eq!(reopened.list_responses("f1").await.unwrap().len(), 1);
        assert!(reopened.is_connected().await);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::open(dir.path().join("none.json")).await.unwrap();
        assert!(store.list_forms().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(FileDocumentStore::open(&path).await, Err(StoreError::Storage(_))));
    }

    #[tokio::test]
    async fn test_failed_flush_rolls_back_and_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("sub");
        let store = FileDocumentStore::open(blocker.join("db.json")).await.unwrap();
        // A plain file where the data directory should be.
        std::fs::write(&blocker, "").unwrap();

        let form = Form { id: "f1".into(), ..Default::default() };
        let err = store.insert_form(FormDocument::new(form.clone())).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert!(store.list_forms().await.unwrap().is_empty());
        assert!(!store.is_connected().await);

        std::fs::remove_file(&blocker).unwrap();
        store.insert_form(FormDocument::new(form)).await.unwrap();
        assert_eq!(store.list_forms().await.unwrap().len(), 1);
        assert!(store.is_connected().await);
    }

    #[tokio::test]
    async fn test_failed_flush_leaves_counter_and_rows_alone() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("sub");
        let store = FileDocumentStore::open(blocker.join("db.json")).await.unwrap();
        let form = Form { id: "f1".into(), ..Default::default() };
        store.insert_form(FormDocument::new(form)).await.unwrap();

        std::fs::remove_dir_all(&blocker).unwrap();
        std::fs::write(&blocker, "").unwrap();
        let response = Response::complete("f1", Answers::new(), 0);
        assert!(store.insert_response(response.clone()).await.is_err());
        assert!(store.list_responses("f1").await.unwrap().is_empty());

        // Retrying the same response after recovery counts it once.
        std::fs::remove_file(&blocker).unwrap();
        assert!(store.insert_response(response).await.unwrap().counted);
        let doc = store.find_form("f1").await.unwrap().unwrap();
        assert_eq!(doc.form.response_count, 1);
        assert_eq!(store.list_responses("f1").await.unwrap().len(), 1);
    }
}
