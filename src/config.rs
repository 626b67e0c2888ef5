use crate::error::FillError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Configuration for one fill pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    /// URL of the form to fill
    pub form_url: String,

    /// Backend base URLs, tried in order until one responds
    #[serde(default = "default_backend_base_urls")]
    pub backend_base_urls: Vec<String>,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Timeout for the backend request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Explicit user id (overrides the credential store)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Path to the credential file holding the stored user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<PathBuf>,

    /// Extract and match only; do not write anything into the page
    #[serde(default)]
    pub dry_run: bool,
}

/// Default backend base URLs
fn default_backend_base_urls() -> Vec<String> {
    vec!["http://localhost:5000".to_string()]
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default backend request timeout
fn default_request_timeout_secs() -> u64 {
    30
}

impl FillConfig {
    /// Create a new configuration with default values
    pub fn new(form_url: &str) -> Self {
        Self {
            form_url: form_url.to_string(),
            backend_base_urls: default_backend_base_urls(),
            webdriver_url: default_webdriver_url(),
            request_timeout_secs: default_request_timeout_secs(),
            uid: None,
            credentials_path: None,
            dry_run: false,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FillError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, FillError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}
