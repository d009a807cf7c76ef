use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiError, UploadFile};
use crate::data::UploadReceipt;
use crate::workspace::events::{FetchOrigin, WorkspaceEvent};
use crate::workspace::reconciler::Reconciler;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Only PDF files can be uploaded: {0}")]
    NotPdf(String),

    #[error("An upload is already in progress")]
    Busy,

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Uploads a document into the mounted session. Documents are never shown
/// optimistically; the list only grows through the follow-up reconcile.
#[derive(Clone)]
pub struct UploadFlow {
    reconciler: Reconciler,
    uploading: Arc<AtomicBool>,
}

/// Clears the uploading flag however the upload ends
struct UploadingFlag<'a>(&'a AtomicBool);

impl Drop for UploadingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub fn is_pdf(filename: &str) -> bool {
    filename.ends_with(".pdf")
}

impl UploadFlow {
    pub fn new(reconciler: Reconciler) -> Self {
        Self {
            reconciler,
            uploading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    /// Read `path` and upload it, then reconcile so the new document and
    /// refreshed summary appear.
    pub async fn upload_path(&self, path: &Path) -> Result<UploadReceipt, UploadError> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_pdf(&filename) {
            return Err(UploadError::NotPdf(path.display().to_string()));
        }

        if self.uploading.swap(true, Ordering::SeqCst) {
            return Err(UploadError::Busy);
        }
        let _flag = UploadingFlag(&self.uploading);

        let mount = self.reconciler.mount();
        self.reconciler.emit(WorkspaceEvent::UploadStarted {
            mount,
            filename: filename.clone(),
        });

        let result = self.send(path, &filename).await;
        match &result {
            Ok(receipt) => {
                tracing::info!(
                    session_id = %self.reconciler.session_id(),
                    filename = %receipt.filename,
                    summary_updated = receipt.summary_updated,
                    "Uploaded document"
                );
                self.reconciler.emit(WorkspaceEvent::UploadFinished {
                    mount,
                    filename,
                    summary_updated: receipt.summary_updated,
                });
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %self.reconciler.session_id(),
                    %filename,
                    error = %e,
                    "Upload failed"
                );
                self.reconciler.emit(WorkspaceEvent::UploadFailed {
                    mount,
                    filename,
                    error: e.to_string(),
                });
            }
        }
        result
    }

    async fn send(&self, path: &Path, filename: &str) -> Result<UploadReceipt, UploadError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let receipt = self
            .reconciler
            .api()
            .upload_document(
                self.reconciler.session_id(),
                UploadFile {
                    filename: filename.to_string(),
                    bytes,
                },
            )
            .await?;

        // The document is stored even if this fetch fails; the next poll shows it
        let _ = self.reconciler.reconcile_once(FetchOrigin::Upload).await;
        Ok(receipt)
    }
}
