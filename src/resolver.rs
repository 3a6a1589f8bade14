//! Link resolution: identifier -> page -> first matching download link

use crate::config::ResolverConfig;
use crate::error::{Error, Result, RetrievalError};
use crate::retrieval::RemoteRetrieval;
use crate::types::Identifier;
use regex::Regex;
use std::sync::Arc;

/// Result of resolving one identifier
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The first link matching the configured pattern
    Found(String),
    /// The page was retrieved but nothing matched
    NotFound,
}

/// Maps an identifier to a downloadable address
///
/// One call performs exactly one page retrieval. Only the first pattern match
/// in the page is used.
pub struct LinkResolver {
    retrieval: Arc<dyn RemoteRetrieval>,
    config: ResolverConfig,
    pattern: Regex,
}

impl LinkResolver {
    /// Create a resolver, compiling the configured link pattern
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] keyed by `link_pattern` if the pattern is not a valid regex.
    pub fn new(config: &ResolverConfig, retrieval: Arc<dyn RemoteRetrieval>) -> Result<Self> {
        let pattern = Regex::new(&config.link_pattern).map_err(|e| {
            Error::config(format!("invalid link pattern: {}", e), "link_pattern")
        })?;
        Ok(Self {
            retrieval,
            config: config.clone(),
            pattern,
        })
    }

    /// Page URL that will be fetched for an identifier
    pub fn page_url(&self, identifier: &Identifier) -> String {
        self.config.page_url(identifier.as_str())
    }

    /// First link in `content` matching the pattern, if any
    pub fn find_link(&self, content: &str) -> Option<String> {
        self.pattern.find(content).map(|m| m.as_str().to_string())
    }

    /// Resolve an identifier to a download link
    ///
    /// # Errors
    ///
    /// Returns a [`RetrievalError`] if the page could not be fetched. A page
    /// without a matching link is `Ok(Resolution::NotFound)`.
    pub async fn resolve(
        &self,
        identifier: &Identifier,
    ) -> std::result::Result<Resolution, RetrievalError> {
        let url = self.page_url(identifier);
        let content = self.retrieval.fetch_text(&url).await?;

        match self.find_link(&content) {
            Some(link) => {
                tracing::debug!(identifier = %identifier, link = %link, "link resolved");
                Ok(Resolution::Found(link))
            }
            None => {
                tracing::info!(identifier = %identifier, url = %url, "no link found on page");
                Ok(Resolution::NotFound)
            }
        }
    }
}
