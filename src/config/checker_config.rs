use std::path::PathBuf;

use serde::Deserialize;

/// Checker settings as read from the YAML configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// The `User-Agent` sent with every check.
    /// Defaults to `status-check/<version>`.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds. No timeout is applied when absent.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Whether the compiled-in private CA is trusted.
    /// Defaults to true.
    #[serde(default = "default_include_embedded_ca")]
    pub include_embedded_ca: bool,

    /// Additional PEM files, one certificate each, trusted on top of the
    /// built-in public roots.
    #[serde(default)]
    pub trusted_ca_files: Vec<PathBuf>,
}

fn default_include_embedded_ca() -> bool {
    true
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_seconds: None,
            include_embedded_ca: default_include_embedded_ca(),
            trusted_ca_files: Vec::new(),
        }
    }
}
