//! Stage chaining: hand a finished artifact to the batch stage
//!
//! The coordinator takes the artifact produced by an upstream stage, derives
//! the identifier list from it and runs the batch stage, either in-process or
//! as a child process that shares this process's terminal.

use crate::artifact;
use crate::config::{ChainMode, Config};
use crate::downloader::BatchDownloader;
use crate::error::{ChainError, Error, Result};
use crate::types::{BatchReport, Identifier};
use crate::utils;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Name of the batch stage as reported in failures
pub const BATCH_STAGE: &str = "batch";

/// What one chain step did
#[derive(Debug)]
pub struct StageOutcome {
    /// Artifact that was consumed
    pub artifact: PathBuf,
    /// Identifiers derived from the artifact, in order
    pub identifiers: Vec<Identifier>,
    /// Batch report (in-process mode or empty input); `None` when a child process ran the batch
    pub report: Option<BatchReport>,
}

/// Starts the batch stage once an upstream artifact is ready
pub struct StageChain {
    config: Config,
    config_path: Option<PathBuf>,
    downloader: Option<BatchDownloader>,
}

impl StageChain {
    /// Create a coordinator for the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            config_path: None,
            downloader: None,
        }
    }

    /// Forward this config file to a spawned batch program
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Use an existing downloader for in-process runs
    ///
    /// Lets callers subscribe to its events before the chain advances.
    pub fn with_downloader(mut self, downloader: BatchDownloader) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Configured execution mode
    pub fn mode(&self) -> ChainMode {
        self.config.chain.mode
    }

    /// Run the batch stage over the identifiers named in `artifact`
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the artifact or the batch program cannot be found
    /// - [`ChainError::Launch`] if the child process cannot be started
    /// - [`ChainError::StageFailed`] if the child process exits unsuccessfully
    pub async fn advance(&self, artifact: &Path) -> Result<StageOutcome> {
        let artifact = utils::locate_input(
            artifact,
            &self.config.download.submissions_dir,
            "artifact",
        )?;
        let text = tokio::fs::read_to_string(&artifact).await.map_err(|e| {
            Error::config(
                format!("cannot read artifact '{}': {}", artifact.display(), e),
                "artifact",
            )
        })?;
        let identifiers = artifact::extract_identifiers(&text)?;

        tracing::info!(
            artifact = %artifact.display(),
            identifiers = identifiers.len(),
            mode = ?self.mode(),
            "artifact ready, starting batch stage"
        );

        if identifiers.is_empty() {
            tracing::warn!(artifact = %artifact.display(), "artifact names no identifiers");
            let mut report = BatchReport::new();
            report.finish();
            return Ok(StageOutcome {
                artifact,
                identifiers,
                report: Some(report),
            });
        }

        let report = match self.mode() {
            ChainMode::InProcess => Some(self.run_in_process(&identifiers).await?),
            ChainMode::Subprocess => {
                let program = self.batch_program()?;
                self.run_subprocess(&program, &identifiers).await?;
                None
            }
        };

        Ok(StageOutcome {
            artifact,
            identifiers,
            report,
        })
    }

    /// Resolve the program that runs the batch stage in subprocess mode
    ///
    /// A configured path containing a directory must exist; a bare name is
    /// looked up on PATH; no configuration means the running executable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] keyed by `chain.batch_program` if the program cannot be found.
    pub fn batch_program(&self) -> Result<PathBuf> {
        const KEY: &str = "chain.batch_program";
        match &self.config.chain.batch_program {
            Some(program) if program.components().count() > 1 => {
                if program.is_file() {
                    Ok(program.clone())
                } else {
                    Err(Error::config(
                        format!("batch program '{}' does not exist", program.display()),
                        KEY,
                    ))
                }
            }
            Some(program) => which::which(program).map_err(|e| {
                Error::config(
                    format!("batch program '{}' not found on PATH: {}", program.display(), e),
                    KEY,
                )
            }),
            None => std::env::current_exe().map_err(|e| {
                Error::config(format!("cannot determine current executable: {}", e), KEY)
            }),
        }
    }

    async fn run_in_process(&self, identifiers: &[Identifier]) -> Result<BatchReport> {
        let downloader = match &self.downloader {
            Some(downloader) => downloader.clone(),
            None => BatchDownloader::new(self.config.clone()).await?,
        };
        Ok(downloader.run(identifiers).await)
    }

    async fn run_subprocess(&self, program: &Path, identifiers: &[Identifier]) -> Result<()> {
        let mut command = Command::new(program);
        if let Some(path) = &self.config_path {
            command.arg("--config").arg(path);
        }
        command
            .arg(BATCH_STAGE)
            .args(identifiers.iter().map(Identifier::as_str))
            .env("PATENT_DL_RESULTS_DIR", &self.config.download.results_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        tracing::info!(program = ?program, identifiers = identifiers.len(), "spawning batch stage");

        let status = command.status().await.map_err(|e| ChainError::Launch {
            program: program.to_path_buf(),
            reason: e.to_string(),
        })?;

        if status.success() {
            tracing::info!(program = ?program, "batch stage finished");
            Ok(())
        } else {
            tracing::warn!(program = ?program, code = ?status.code(), "batch stage failed");
            Err(ChainError::StageFailed {
                stage: BATCH_STAGE.to_string(),
                code: status.code(),
            }
            .into())
        }
    }
}
