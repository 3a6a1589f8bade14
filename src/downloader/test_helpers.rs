//! Shared test helpers: a scripted retrieval backend and downloader constructors.

use crate::config::Config;
use crate::downloader::BatchDownloader;
use crate::error::{DownloadError, RetrievalError};
use crate::retrieval::{ByteStream, RemoteRetrieval};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

#[derive(Clone)]
enum Page {
    Body(String),
    Error,
}

#[derive(Clone)]
enum File {
    Chunks(Vec<Vec<u8>>),
    Broken(Vec<Vec<u8>>),
    Refused,
}

/// In-memory [`RemoteRetrieval`] answering from scripted pages and files
///
/// Unscripted page URLs return an empty page (no link); unscripted file URLs
/// are refused. Every requested URL is recorded in order.
#[derive(Clone, Default)]
pub(crate) struct FakeRetrieval {
    pages: HashMap<String, Page>,
    files: HashMap<String, File>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeRetrieval {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for page `url`
    pub(crate) fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Page::Body(body.to_string()));
        self
    }

    /// Fail page retrieval for `url`
    pub(crate) fn page_error(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), Page::Error);
        self
    }

    /// Serve a complete file at `url` in the given chunks
    pub(crate) fn file(mut self, url: &str, chunks: &[&[u8]]) -> Self {
        self.files.insert(url.to_string(), File::Chunks(to_vecs(chunks)));
        self
    }

    /// Serve `chunks` at `url`, then break the stream
    pub(crate) fn broken_file(mut self, url: &str, chunks: &[&[u8]]) -> Self {
        self.files.insert(url.to_string(), File::Broken(to_vecs(chunks)));
        self
    }

    /// Refuse to start a transfer for `url`
    pub(crate) fn refused_file(mut self, url: &str) -> Self {
        self.files.insert(url.to_string(), File::Refused);
        self
    }

    /// Shared log of every URL requested
    pub(crate) fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }

    fn record(&self, url: &str) {
        self.calls.lock().unwrap().push(url.to_string());
    }
}

fn to_vecs(chunks: &[&[u8]]) -> Vec<Vec<u8>> {
    chunks.iter().map(|c| c.to_vec()).collect()
}

#[async_trait]
impl RemoteRetrieval for FakeRetrieval {
    async fn fetch_text(&self, url: &str) -> Result<String, RetrievalError> {
        self.record(url);
        match self.pages.get(url) {
            Some(Page::Body(body)) => Ok(body.clone()),
            Some(Page::Error) => Err(RetrievalError::Transport {
                url: url.to_string(),
                reason: "connection reset".to_string(),
            }),
            None => Ok(String::new()),
        }
    }

    async fn fetch_stream(&self, url: &str) -> Result<ByteStream, DownloadError> {
        self.record(url);
        let refused = || DownloadError::Transfer {
            url: url.to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        };
        let (chunks, broken) = match self.files.get(url) {
            Some(File::Chunks(chunks)) => (chunks.clone(), false),
            Some(File::Broken(chunks)) => (chunks.clone(), true),
            Some(File::Refused) | None => return Err(refused()),
        };

        let mut items: Vec<Result<Bytes, DownloadError>> =
            chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect();
        if broken {
            items.push(Err(DownloadError::Transfer {
                url: url.to_string(),
                reason: "connection closed mid-body".to_string(),
            }));
        }
        Ok(futures::stream::iter(items).boxed())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Page URL the default resolver config produces for `id`
pub(crate) fn page_url(id: &str) -> String {
    format!("https://patents.google.com/patent/{}", id)
}

/// Link the default pattern matches for `id`
pub(crate) fn pdf_url(id: &str) -> String {
    format!("https://patentimages.storage.googleapis.com/pdfs/{}.pdf", id)
}

/// Page body that links to [`pdf_url`]
pub(crate) fn page_with_link(id: &str) -> String {
    format!(r#"<html><a href="{}">Download PDF</a></html>"#, pdf_url(id))
}

/// Create a downloader over `fake` with results in a fresh temp dir.
/// Returns the downloader and the tempdir (which must be kept alive).
pub(crate) async fn create_test_downloader(
    fake: FakeRetrieval,
) -> (BatchDownloader, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let mut config = Config::default();
    config.download.results_dir = temp_dir.path().join("results");
    config.download.submissions_dir = temp_dir.path().join("submissions");

    let downloader = BatchDownloader::with_retrieval(config, Arc::new(fake))
        .await
        .unwrap();
    (downloader, temp_dir)
}
