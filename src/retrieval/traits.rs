//! Trait and stream type for remote retrieval

use crate::error::{DownloadError, RetrievalError};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

/// Incremental body of a remote resource
///
/// Each item is one chunk; an `Err` item means the transfer broke mid-stream.
pub type ByteStream = BoxStream<'static, std::result::Result<Bytes, DownloadError>>;

/// Trait for fetching remote content
///
/// Implementations perform exactly one request per call and do not retry.
/// Redirect handling, if any, belongs to the implementation.
#[async_trait]
pub trait RemoteRetrieval: Send + Sync {
    /// Retrieve a page as text
    ///
    /// # Errors
    ///
    /// Returns a [`RetrievalError`] if the fetch could not be completed.
    async fn fetch_text(&self, url: &str) -> std::result::Result<String, RetrievalError>;

    /// Open a byte stream for a resource
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Transfer`] if the transfer cannot be started.
    async fn fetch_stream(&self, url: &str) -> std::result::Result<ByteStream, DownloadError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
