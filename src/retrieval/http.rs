//! HTTP retrieval backed by reqwest

use super::traits::{ByteStream, RemoteRetrieval};
use crate::config::ResolverConfig;
use crate::error::{DownloadError, Error, Result, RetrievalError};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;

/// `reqwest`-backed [`RemoteRetrieval`]
///
/// Redirects are followed by the client. A 404 page counts as a completed
/// fetch: its body is returned and simply will not contain a link. Any other
/// non-success status is a [`RetrievalError::Status`].
#[derive(Clone, Debug)]
pub struct HttpRetrieval {
    client: reqwest::Client,
}

impl HttpRetrieval {
    /// Build a client from resolver settings (user agent, optional timeout)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| Error::Config {
            message: format!("Failed to create HTTP client: {}", e),
            key: Some("resolver".to_string()),
        })?;
        Ok(Self { client })
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

#[async_trait]
impl RemoteRetrieval for HttpRetrieval {
    async fn fetch_text(&self, url: &str) -> std::result::Result<String, RetrievalError> {
        tracing::debug!(url = %url, "fetching page");

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| RetrievalError::Transport {
                    url: url.to_string(),
                    reason: describe(&e),
                })?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(RetrievalError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| RetrievalError::Body {
            url: url.to_string(),
            reason: describe(&e),
        })
    }

    async fn fetch_stream(&self, url: &str) -> std::result::Result<ByteStream, DownloadError> {
        tracing::debug!(url = %url, "opening download stream");

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| DownloadError::Transfer {
                    url: url.to_string(),
                    reason: describe(&e),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Transfer {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let url = url.to_string();
        let stream = response.bytes_stream().map(move |chunk| {
            chunk.map_err(|e| DownloadError::Transfer {
                url: url.clone(),
                reason: describe(&e),
            })
        });
        Ok(stream.boxed())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
