//! Per-identifier acquisition and the sequential batch loop

use super::{BatchDownloader, Transfer};
use crate::error::Result;
use crate::resolver::Resolution;
use crate::types::{BatchReport, DownloadOutcome, Event, Identifier};

impl BatchDownloader {
    /// Resolve and download a single identifier
    ///
    /// Never fails: every error is folded into [`DownloadOutcome::Failed`] so a
    /// batch can continue with the next identifier.
    pub async fn acquire(&self, identifier: &Identifier) -> DownloadOutcome {
        match self.try_acquire(identifier).await {
            Ok(outcome) => outcome,
            Err(e) => self.fail(identifier, e.to_string()),
        }
    }

    /// Resolve and download a single identifier, keeping the error type
    ///
    /// A page without a link is `Ok(DownloadOutcome::NotFound)`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIdentifier`](crate::Error::InvalidIdentifier) if the identifier cannot name a file
    /// - [`Error::Retrieval`](crate::Error::Retrieval) if the page could not be fetched
    /// - [`Error::Download`](crate::Error::Download) if the transfer or the write failed
    pub async fn try_acquire(&self, identifier: &Identifier) -> Result<DownloadOutcome> {
        identifier.ensure_file_safe()?;

        self.emit_event(Event::Resolving {
            identifier: identifier.clone(),
            url: self.page_url(identifier),
        });

        let link = match self.resolver.resolve(identifier).await? {
            Resolution::Found(link) => link,
            Resolution::NotFound => {
                tracing::info!(identifier = %identifier, "no download link found");
                self.emit_event(Event::NotFound {
                    identifier: identifier.clone(),
                });
                return Ok(DownloadOutcome::NotFound);
            }
        };

        let destination = self.destination_for(identifier);
        match self.fetcher.download(&link, &destination).await? {
            Transfer::Written { bytes } => {
                tracing::info!(
                    identifier = %identifier,
                    path = %destination.display(),
                    bytes,
                    "downloaded"
                );
                self.emit_event(Event::Downloaded {
                    identifier: identifier.clone(),
                    path: destination.clone(),
                    bytes,
                });
                Ok(DownloadOutcome::Downloaded {
                    path: destination,
                    bytes,
                })
            }
            Transfer::SkippedExisting => {
                tracing::info!(
                    identifier = %identifier,
                    path = %destination.display(),
                    "already downloaded, skipping"
                );
                self.emit_event(Event::Skipped {
                    identifier: identifier.clone(),
                    path: destination.clone(),
                });
                Ok(DownloadOutcome::SkippedExisting { path: destination })
            }
        }
    }

    /// Acquire every identifier in order, one at a time
    ///
    /// The report has exactly one record per input identifier, in input order;
    /// duplicates are processed each time they appear. After each identifier
    /// the progress callback runs and an [`Event::Progress`] is emitted; a
    /// single [`Event::BatchComplete`] follows at the end.
    pub async fn run(&self, identifiers: &[Identifier]) -> BatchReport {
        let total = identifiers.len();
        tracing::info!(total, "starting batch");

        let mut report = BatchReport::new();
        for (index, identifier) in identifiers.iter().enumerate() {
            let outcome = self.acquire(identifier).await;
            tracing::debug!(identifier = %identifier, outcome = outcome.label(), "identifier finished");
            report.push(identifier.clone(), outcome);

            if let Some(on_progress) = &self.on_progress {
                on_progress(index + 1, total);
            }
            self.emit_event(Event::Progress {
                processed: index + 1,
                total,
            });
        }
        report.finish();

        let summary = &report.summary;
        tracing::info!(
            total,
            downloaded = summary.downloaded,
            skipped = summary.skipped.len(),
            not_found = summary.not_found.len(),
            failed = summary.failed.len(),
            "batch complete"
        );
        self.emit_event(Event::BatchComplete {
            total,
            downloaded: summary.downloaded,
            skipped: summary.skipped.len(),
            not_found: summary.not_found.len(),
            failed: summary.failed.len(),
        });

        report
    }

    fn fail(&self, identifier: &Identifier, reason: String) -> DownloadOutcome {
        tracing::warn!(identifier = %identifier, error = %reason, "acquisition failed");
        self.emit_event(Event::Failed {
            identifier: identifier.clone(),
            error: reason.clone(),
        });
        DownloadOutcome::Failed { reason }
    }
}
