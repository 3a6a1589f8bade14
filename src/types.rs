//! Core types for patent-dl

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use utoipa::ToSchema;

/// Opaque reference code naming one resource to acquire (e.g. a patent number)
///
/// Only surrounding whitespace is trimmed. Whether the code is usable as a
/// file name is checked per identifier by [`Identifier::ensure_file_safe`], so
/// one unusable entry fails on its own instead of rejecting a whole list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Parse one identifier, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for empty or all-whitespace input.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidIdentifier(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parse a comma- or newline-delimited list, skipping empty entries
    ///
    /// Order is preserved and duplicates are kept: the batch processes exactly
    /// what the caller listed.
    pub fn parse_list(text: &str) -> Vec<Self> {
        text.split([',', '\n'])
            .filter_map(|entry| Self::parse(entry).ok())
            .collect()
    }

    /// Check that the identifier can name a file inside the results directory
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for `.`/`..` or identifiers
    /// containing `/`, `\` or NUL.
    pub fn ensure_file_safe(&self) -> Result<()> {
        let id = self.0.as_str();
        if id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
            return Err(Error::InvalidIdentifier(id.to_string()));
        }
        Ok(())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Result of acquiring one identifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// The resource was fetched and written
    Downloaded {
        /// Destination file
        #[schema(value_type = String)]
        path: PathBuf,
        /// Bytes written
        bytes: u64,
    },
    /// The destination already existed; nothing was fetched
    SkippedExisting {
        /// Destination file
        #[schema(value_type = String)]
        path: PathBuf,
    },
    /// The page was retrieved but contained no download link
    NotFound,
    /// Retrieval or download failed
    Failed {
        /// Diagnostic text
        reason: String,
    },
}

impl DownloadOutcome {
    /// Short label used in logs and console output
    pub fn label(&self) -> &'static str {
        match self {
            DownloadOutcome::Downloaded { .. } => "downloaded",
            DownloadOutcome::SkippedExisting { .. } => "skipped_existing",
            DownloadOutcome::NotFound => "not_found",
            DownloadOutcome::Failed { .. } => "failed",
        }
    }
}

/// One identifier paired with its outcome
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OutcomeRecord {
    /// The identifier as given
    pub identifier: Identifier,
    /// What happened to it
    pub outcome: DownloadOutcome,
}

/// Identifier that failed, with the diagnostic
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRecord {
    /// The identifier as given
    pub identifier: Identifier,
    /// Diagnostic text
    pub reason: String,
}

/// Final tally of a batch, filled in when the batch finishes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Identifiers attempted
    pub total: usize,
    /// Freshly downloaded
    pub downloaded: usize,
    /// Identifiers whose destination already existed
    pub skipped: Vec<Identifier>,
    /// Identifiers with no download link
    pub not_found: Vec<Identifier>,
    /// Identifiers that failed
    pub failed: Vec<FailedRecord>,
}

/// Ordered tally of one batch run
///
/// Records are appended in input order and never modified afterwards. The
/// summary fields are serialized alongside the records.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchReport {
    /// Counts and identifier lists, computed by `finish`
    #[serde(flatten, default)]
    pub summary: BatchSummary,
    /// One record per input identifier, in input order
    pub outcomes: Vec<OutcomeRecord>,
    /// When the batch started
    pub started_at: DateTime<Utc>,
    /// When the batch finished (None while running)
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchReport {
    /// Start an empty report
    pub fn new() -> Self {
        Self {
            summary: BatchSummary::default(),
            outcomes: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub(crate) fn push(&mut self, identifier: Identifier, outcome: DownloadOutcome) {
        self.outcomes.push(OutcomeRecord {
            identifier,
            outcome,
        });
    }

    pub(crate) fn finish(&mut self) {
        self.summary = BatchSummary {
            total: self.total(),
            downloaded: self.downloaded().len(),
            skipped: self.skipped().into_iter().cloned().collect(),
            not_found: self.not_found().into_iter().cloned().collect(),
            failed: self
                .failed()
                .into_iter()
                .map(|(identifier, reason)| FailedRecord {
                    identifier: identifier.clone(),
                    reason: reason.to_string(),
                })
                .collect(),
        };
        self.finished_at = Some(Utc::now());
    }

    /// Number of identifiers attempted
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Identifiers that were freshly downloaded
    pub fn downloaded(&self) -> Vec<&Identifier> {
        self.matching(|o| matches!(o, DownloadOutcome::Downloaded { .. }))
    }

    /// Identifiers whose destination already existed
    pub fn skipped(&self) -> Vec<&Identifier> {
        self.matching(|o| matches!(o, DownloadOutcome::SkippedExisting { .. }))
    }

    /// Identifiers for which no link was found
    pub fn not_found(&self) -> Vec<&Identifier> {
        self.matching(|o| matches!(o, DownloadOutcome::NotFound))
    }

    /// Identifiers that failed, with the failure reason
    pub fn failed(&self) -> Vec<(&Identifier, &str)> {
        self.outcomes
            .iter()
            .filter_map(|r| match &r.outcome {
                DownloadOutcome::Failed { reason } => Some((&r.identifier, reason.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Files written during this run
    pub fn downloaded_files(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|r| match &r.outcome {
                DownloadOutcome::Downloaded { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    fn matching(&self, pred: impl Fn(&DownloadOutcome) -> bool) -> Vec<&Identifier> {
        self.outcomes
            .iter()
            .filter(|r| pred(&r.outcome))
            .map(|r| &r.identifier)
            .collect()
    }

    /// One-line count summary
    pub fn summary_line(&self) -> String {
        format!(
            "All identifiers processed: {} total, {} downloaded, {} skipped, {} not found, {} failed",
            self.total(),
            self.downloaded().len(),
            self.skipped().len(),
            self.not_found().len(),
            self.failed().len()
        )
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary_line())?;

        let not_found = self.not_found();
        if !not_found.is_empty() {
            writeln!(f, "Not found:")?;
            for id in not_found {
                writeln!(f, "  {id}")?;
            }
        }

        let failed = self.failed();
        if !failed.is_empty() {
            writeln!(f, "Failed:")?;
            for (id, reason) in failed {
                writeln!(f, "  {id}: {reason}")?;
            }
        }

        let files = self.downloaded_files();
        if !files.is_empty() {
            writeln!(f, "Downloaded files:")?;
            for path in files {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_else(|| path.to_string_lossy());
                writeln!(f, "  {name}")?;
            }
        }
        Ok(())
    }
}

/// Event emitted by the batch orchestrator
///
/// Consumers receive these through [`BatchDownloader::subscribe`](crate::BatchDownloader::subscribe).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Fetching the page for an identifier
    Resolving {
        /// Identifier being resolved
        identifier: Identifier,
        /// Page URL
        url: String,
    },

    /// A resource was written to disk
    Downloaded {
        /// Identifier
        identifier: Identifier,
        /// Destination path
        #[schema(value_type = String)]
        path: PathBuf,
        /// Bytes written
        bytes: u64,
    },

    /// Destination already existed
    Skipped {
        /// Identifier
        identifier: Identifier,
        /// Existing destination path
        #[schema(value_type = String)]
        path: PathBuf,
    },

    /// No link matched on the page
    NotFound {
        /// Identifier
        identifier: Identifier,
    },

    /// Retrieval or download failed
    Failed {
        /// Identifier
        identifier: Identifier,
        /// Diagnostic text
        error: String,
    },

    /// Running progress after each identifier
    Progress {
        /// Identifiers finished so far
        processed: usize,
        /// Identifiers in the batch
        total: usize,
    },

    /// The batch finished
    BatchComplete {
        /// Identifiers attempted
        total: usize,
        /// Freshly downloaded
        downloaded: usize,
        /// Already present
        skipped: usize,
        /// No link found
        not_found: usize,
        /// Failed
        failed: usize,
    },
}
