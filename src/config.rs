//! Configuration types for patent-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, path::PathBuf, time::Duration};

/// Link resolution settings (which page to fetch, which link to extract)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Page URL template; `{id}` is replaced by the URL-encoded identifier
    #[serde(default = "default_page_url_template")]
    pub page_url_template: String,

    /// Regex matched against the page content; the first match is the download link
    #[serde(default = "default_link_pattern")]
    pub link_pattern: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (None = wait indefinitely)
    #[serde(default, with = "optional_duration_secs")]
    pub request_timeout: Option<Duration>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            page_url_template: default_page_url_template(),
            link_pattern: default_link_pattern(),
            user_agent: default_user_agent(),
            request_timeout: None,
        }
    }
}

impl ResolverConfig {
    /// Page URL for one identifier
    pub fn page_url(&self, identifier: &str) -> String {
        self.page_url_template
            .replace("{id}", &urlencoding::encode(identifier))
    }
}

/// What to do when the destination file already exists
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Leave the existing file alone and report it as skipped (default)
    #[default]
    SkipExisting,
    /// Download again, replacing the existing file
    Overwrite,
}

/// Download behavior configuration (directories, naming, dedup)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Results directory (default: "results"), created if absent
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Submissions directory holding stage-input artifacts (default: "submissions")
    #[serde(default = "default_submissions_dir")]
    pub submissions_dir: PathBuf,

    /// Destination file extension, without the dot (default: "pdf")
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Existing-file policy
    #[serde(default)]
    pub dedup: DedupPolicy,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            submissions_dir: default_submissions_dir(),
            extension: default_extension(),
            dedup: DedupPolicy::default(),
        }
    }
}

/// How the chain coordinator runs the batch stage
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainMode {
    /// Call the batch orchestrator directly (default)
    #[default]
    InProcess,
    /// Spawn the batch program as a child process with inherited stdio
    Subprocess,
}

/// Stage chaining configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Execution mode for the batch stage
    #[serde(default)]
    pub mode: ChainMode,

    /// Batch program for subprocess mode (None = the running executable)
    ///
    /// A bare program name is searched for on PATH.
    #[serde(default)]
    pub batch_program: Option<PathBuf>,
}

/// HTTP front end configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind (default: 127.0.0.1:3000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Directory with static front end assets (default: "public")
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Enable CORS (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            static_dir: default_static_dir(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
        }
    }
}

/// Main configuration
///
/// Every section is optional in the JSON file; missing keys take their defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Link resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Destination directory and dedup settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Stage chaining settings
    #[serde(default)]
    pub chain: ChainConfig,

    /// HTTP front end settings
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read config file '{}': {}", path.display(), e),
            key: None,
        })?;
        serde_json::from_str(&raw).map_err(|e| Error::Config {
            message: format!("invalid config file '{}': {}", path.display(), e),
            key: None,
        })
    }
}

fn default_page_url_template() -> String {
    "https://patents.google.com/patent/{id}".to_string()
}

fn default_link_pattern() -> String {
    r"https://patentimages\.storage\.googleapis\.com/.*?\.pdf".to_string()
}

fn default_user_agent() -> String {
    format!("patent-dl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_submissions_dir() -> PathBuf {
    PathBuf::from("submissions")
}

fn default_extension() -> String {
    "pdf".to_string()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

/// Serde helper for optional durations stored as whole seconds
mod optional_duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
