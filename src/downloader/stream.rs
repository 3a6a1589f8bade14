//! Streaming a remote resource into a local file

use crate::config::DedupPolicy;
use crate::error::DownloadError;
use crate::retrieval::{ByteStream, RemoteRetrieval};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// What a single transfer did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// The destination was written from the remote body
    Written {
        /// Bytes written
        bytes: u64,
    },
    /// The destination already existed and was left untouched
    SkippedExisting,
}

/// Writes remote resources to disk chunk by chunk
///
/// The body is never buffered whole in memory. A failed transfer never leaves
/// a partial file at the destination.
pub struct StreamingDownloader {
    retrieval: Arc<dyn RemoteRetrieval>,
    dedup: DedupPolicy,
}

impl StreamingDownloader {
    /// Create a downloader over the given retrieval backend
    pub fn new(retrieval: Arc<dyn RemoteRetrieval>, dedup: DedupPolicy) -> Self {
        Self { retrieval, dedup }
    }

    /// Download `url` to `destination`
    ///
    /// With [`DedupPolicy::SkipExisting`] an existing destination is left alone
    /// and no transfer is started.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::Transfer`] if the transfer cannot start or breaks mid-stream
    /// - [`DownloadError::Write`] if the destination cannot be created or written
    ///
    /// In both cases no file remains at `destination`.
    pub async fn download(&self, url: &str, destination: &Path) -> Result<Transfer, DownloadError> {
        if self.dedup == DedupPolicy::SkipExisting
            && tokio::fs::try_exists(destination).await.unwrap_or(false)
        {
            tracing::debug!(path = %destination.display(), "destination exists, skipping transfer");
            return Ok(Transfer::SkippedExisting);
        }

        // Open the stream first so an HTTP error never creates a file
        let mut stream = self.retrieval.fetch_stream(url).await?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true);
        match self.dedup {
            DedupPolicy::SkipExisting => options.create_new(true),
            DedupPolicy::Overwrite => options.create(true).truncate(true),
        };

        let mut file = match options.open(destination).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::debug!(path = %destination.display(), "destination appeared concurrently, skipping");
                return Ok(Transfer::SkippedExisting);
            }
            Err(e) => return Err(write_error(destination, &e)),
        };

        match copy_stream(&mut stream, &mut file, destination).await {
            Ok(bytes) => {
                tracing::debug!(url = %url, path = %destination.display(), bytes, "transfer complete");
                Ok(Transfer::Written { bytes })
            }
            Err(e) => {
                drop(file);
                remove_partial(destination).await;
                Err(e)
            }
        }
    }
}

async fn copy_stream(
    stream: &mut ByteStream,
    file: &mut tokio::fs::File,
    destination: &Path,
) -> Result<u64, DownloadError> {
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| write_error(destination, &e))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| write_error(destination, &e))?;
    file.sync_all()
        .await
        .map_err(|e| write_error(destination, &e))?;
    Ok(written)
}

async fn remove_partial(destination: &Path) {
    match tokio::fs::remove_file(destination).await {
        Ok(()) => {
            tracing::debug!(path = %destination.display(), "removed partial file");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(
                path = %destination.display(),
                error = %e,
                "failed to remove partial file"
            );
        }
    }
}

fn write_error(destination: &Path, e: &std::io::Error) -> DownloadError {
    DownloadError::Write {
        path: destination.to_path_buf(),
        reason: e.to_string(),
    }
}
