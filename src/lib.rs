//! # patent-dl
//!
//! Resolve patent identifiers to PDF documents and download them in
//! sequential batches.
//!
//! ## Pipeline
//!
//! - [`resolver`] fetches an identifier's page and picks the first download link
//! - [`downloader`] streams that link to `<results_dir>/<identifier>.pdf`,
//!   skipping documents that are already present
//! - [`BatchDownloader::run`] processes a list one identifier at a time and
//!   returns a [`BatchReport`]
//! - [`StageChain`] starts a batch from an upstream artifact, in-process or
//!   as a child process
//!
//! Remote access goes through the [`retrieval::RemoteRetrieval`] trait so
//! tests can substitute failures.
//!
//! ## Quick Start
//!
//! ```no_run
//! use patent_dl::{BatchDownloader, Config, Identifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = BatchDownloader::new(Config::default()).await?;
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let ids = Identifier::parse_list("US1234567,US0000000");
//!     let report = downloader.run(&ids).await;
//!     print!("{report}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP front end
pub mod api;
/// Identifier extraction from pipeline artifacts
pub mod artifact;
/// Stage chain coordinator
pub mod chain;
/// Configuration types
pub mod config;
/// Streaming downloader and batch orchestrator
pub mod downloader;
/// Error types
pub mod error;
/// Identifier -> download link resolution
pub mod resolver;
/// Remote retrieval capability
pub mod retrieval;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use chain::{StageChain, StageOutcome};
pub use config::{ChainMode, Config, DedupPolicy};
pub use downloader::{BatchDownloader, ProgressCallback};
pub use error::{
    ApiError, ChainError, DownloadError, Error, ErrorDetail, Result, RetrievalError,
    ToHttpStatus,
};
pub use resolver::{LinkResolver, Resolution};
pub use types::{
    BatchReport, BatchSummary, DownloadOutcome, Event, FailedRecord, Identifier, OutcomeRecord,
};

/// Resolve once the process is asked to stop
///
/// On Unix this is SIGTERM or SIGINT. A signal whose handler cannot be
/// installed is ignored; if neither can be installed, Ctrl+C is awaited.
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let terminate = signal(SignalKind::terminate())
        .inspect_err(|e| tracing::warn!(error = %e, "SIGTERM handler unavailable"))
        .ok();
    let interrupt = signal(SignalKind::interrupt())
        .inspect_err(|e| tracing::warn!(error = %e, "SIGINT handler unavailable"))
        .ok();

    match (terminate, interrupt) {
        (Some(mut terminate), Some(mut interrupt)) => {
            tokio::select! {
                _ = terminate.recv() => tracing::info!("SIGTERM received, shutting down"),
                _ = interrupt.recv() => tracing::info!("SIGINT received, shutting down"),
            }
        }
        (Some(mut terminate), None) => {
            terminate.recv().await;
            tracing::info!("SIGTERM received, shutting down");
        }
        (None, Some(mut interrupt)) => {
            interrupt.recv().await;
            tracing::info!("SIGINT received, shutting down");
        }
        (None, None) => {
            tracing::error!("no signal handlers installed, falling back to ctrl_c");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Resolve on Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for Ctrl+C");
        return;
    }
    tracing::info!("Ctrl+C received, shutting down");
}
