//! Batch downloader split into focused submodules.
//!
//! The `BatchDownloader` struct and its methods are organized by concern:
//! - [`stream`] - Streaming a remote resource to a local file
//! - [`batch`] - Per-identifier acquisition and the sequential batch loop

mod batch;
mod stream;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use stream::{StreamingDownloader, Transfer};

use crate::config::Config;
use crate::error::Result;
use crate::resolver::LinkResolver;
use crate::retrieval::{HttpRetrieval, RemoteRetrieval};
use crate::types::{Event, Identifier};
use crate::utils;
use std::path::PathBuf;
use std::sync::Arc;

/// Called with `(processed, total)` after each identifier of a batch
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Sequential identifier downloader (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct BatchDownloader {
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Identifier -> link resolution
    pub(crate) resolver: Arc<LinkResolver>,
    /// Link -> local file transfer
    pub(crate) fetcher: Arc<StreamingDownloader>,
    /// Invoked synchronously from the batch loop
    pub(crate) on_progress: Option<ProgressCallback>,
}

impl BatchDownloader {
    /// Create a downloader that talks to the network over HTTP
    ///
    /// Creates the results directory if it does not exist yet.
    pub async fn new(config: Config) -> Result<Self> {
        let retrieval = Arc::new(HttpRetrieval::new(&config.resolver)?);
        Self::with_retrieval(config, retrieval).await
    }

    /// Create a downloader over a custom [`RemoteRetrieval`] implementation
    pub async fn with_retrieval(
        config: Config,
        retrieval: Arc<dyn RemoteRetrieval>,
    ) -> Result<Self> {
        utils::ensure_directory(&config.download.results_dir).await?;

        let resolver = LinkResolver::new(&config.resolver, retrieval.clone())?;
        let fetcher = StreamingDownloader::new(retrieval.clone(), config.download.dedup);

        // Buffer size of 1000 events; slow subscribers see Lagged rather than blocking the batch
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        tracing::info!(
            retrieval = retrieval.name(),
            results_dir = %config.download.results_dir.display(),
            dedup = ?config.download.dedup,
            "Batch downloader initialized"
        );

        Ok(Self {
            event_tx,
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            fetcher: Arc::new(fetcher),
            on_progress: None,
        })
    }

    /// Call `callback(processed, total)` after each identifier of every batch
    #[must_use]
    pub fn with_progress(
        mut self,
        callback: impl Fn(usize, usize) + Send + Sync + 'static,
    ) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Subscribe to downloader events
    ///
    /// Each subscriber receives events emitted after it subscribed.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Page URL fetched to resolve an identifier
    pub fn page_url(&self, identifier: &Identifier) -> String {
        self.resolver.page_url(identifier)
    }

    /// Local path an identifier's document is stored at
    pub fn destination_for(&self, identifier: &Identifier) -> PathBuf {
        utils::destination_path(
            &self.config.download.results_dir,
            identifier,
            &self.config.download.extension,
        )
    }

    /// Send an event to all subscribers, ignoring the no-subscriber case
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
