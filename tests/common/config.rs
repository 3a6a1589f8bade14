//! Test configuration helpers pointing the resolver at a mock server

use patent_dl::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::MockServer;

/// Config whose pages and PDF links live on `server`, with all dirs under `temp`
pub fn test_config(server: &MockServer, temp: &TempDir) -> Config {
    let mut config = Config::default();
    config.resolver.page_url_template = format!("{}/patent/{{id}}", server.uri());
    config.resolver.link_pattern = format!(r"{}/pdfs/[^/\x22]+/[^/\x22]+?\.pdf", regex::escape(&server.uri()));
    config.download.results_dir = temp.path().join("results");
    config.download.submissions_dir = temp.path().join("submissions");
    config
}

/// Write `config` as JSON into `temp` and return its path
pub fn write_config(temp: &TempDir, config: &Config) -> PathBuf {
    let path = temp.path().join("patent-dl.json");
    std::fs::write(&path, serde_json::to_string_pretty(config).unwrap()).unwrap();
    path
}

/// Write a text file into `dir`, creating the directory if needed
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
