//! `patent-dl` command line: batch stage, stage chain and HTTP front end

use clap::{Parser, Subcommand};
use patent_dl::config::ChainMode;
use patent_dl::{BatchDownloader, Config, Error, Identifier, Result, StageChain, utils};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "patent-dl", version, about = "Download patent PDFs by identifier")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "PATENT_DL_CONFIG")]
    config: Option<PathBuf>,

    /// Directory downloaded documents are written to
    #[arg(long, global = true, env = "PATENT_DL_RESULTS_DIR")]
    results_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download every identifier, one at a time
    Batch {
        /// Identifiers, one per argument
        identifiers: Vec<String>,

        /// Read comma-separated identifiers from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Start the batch stage from an upstream artifact
    Chain {
        /// Artifact file (looked up under the submissions directory if not found as given)
        artifact: PathBuf,

        /// Run the batch stage as a child process
        #[arg(long)]
        subprocess: bool,
    },

    /// Run the HTTP front end until SIGINT/SIGTERM
    Serve {
        /// Address to bind (overrides the configured one)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("patent_dl=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn exit_code(error: &Error) -> u8 {
    match error {
        Error::Chain(chain) => u8::try_from(chain.exit_code()).unwrap_or(1),
        _ => 1,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(dir) = cli.results_dir {
        config.download.results_dir = dir;
    }

    match cli.command {
        Command::Batch {
            identifiers,
            file,
            json,
        } => run_batch(config, identifiers, file, json).await,
        Command::Chain {
            artifact,
            subprocess,
        } => {
            if subprocess {
                config.chain.mode = ChainMode::Subprocess;
            }
            run_chain(config, cli.config, artifact).await
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.api.bind_address = bind;
            }
            let downloader = Arc::new(BatchDownloader::new(config.clone()).await?);
            patent_dl::api::start_api_server(downloader, Arc::new(config)).await
        }
    }
}

async fn run_batch(
    config: Config,
    args: Vec<String>,
    file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut identifiers: Vec<Identifier> = args
        .iter()
        .filter_map(|raw| Identifier::parse(raw).ok())
        .collect();

    if let Some(file) = file {
        let path = utils::locate_input(&file, &config.download.submissions_dir, "file")?;
        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            Error::config(
                format!("cannot read identifier file '{}': {}", path.display(), e),
                "file",
            )
        })?;
        identifiers.extend(Identifier::parse_list(&text));
    }

    if identifiers.is_empty() {
        tracing::warn!("no identifiers given");
    }

    let mut downloader = BatchDownloader::new(config).await?;
    if !json {
        downloader = downloader.with_progress(print_progress);
    }

    let report = downloader.run(&identifiers).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

async fn run_chain(config: Config, config_path: Option<PathBuf>, artifact: PathBuf) -> Result<()> {
    let mut chain = StageChain::new(config.clone());
    if let Some(path) = config_path {
        chain = chain.with_config_path(path);
    }

    if chain.mode() == ChainMode::InProcess {
        let downloader = BatchDownloader::new(config).await?.with_progress(print_progress);
        chain = chain.with_downloader(downloader);
    }

    let outcome = chain.advance(&artifact).await?;
    if let Some(report) = outcome.report {
        print!("{report}");
    }
    Ok(())
}

fn print_progress(processed: usize, total: usize) {
    println!("{processed}/{total} processed");
}
