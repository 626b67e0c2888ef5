// Re-export modules
pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod matcher;
pub mod normalize;
pub mod report;
pub mod store;
pub mod writer;

// Re-export commonly used types for convenience
pub use config::FillConfig;
pub use error::FillError;
pub use extract::{Field, FieldKind};
pub use gateway::AnswerRecord;
pub use report::{FieldStatus, FillReport};

use gateway::{Gateway, QuestionPayload};
use std::time::Duration;
use store::CredentialStore;
use url::Url;
use writer::WebDriverRunner;

/// Builder for one fill pass: extract the form's questions, fetch answers
/// from the backend, match, and write them into the live page.
///
/// `run` consumes the session, so a fill that is in flight cannot be
/// re-entered; starting another pass means building another session.
pub struct FillSession {
    config: FillConfig,
}

impl FillSession {
    /// Create a session for the given form URL with default configuration
    pub fn new(form_url: impl Into<String>) -> Self {
        Self {
            config: FillConfig::new(&form_url.into()),
        }
    }

    /// Create a session from a full configuration
    pub fn from_config(config: FillConfig) -> Self {
        Self { config }
    }

    /// Load the configuration from a JSON file
    pub fn from_config_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, FillError> {
        Ok(Self {
            config: FillConfig::from_file(path)?,
        })
    }

    /// Replace the backend base URLs
    pub fn with_backend_urls(mut self, urls: Vec<String>) -> Self {
        if !urls.is_empty() {
            self.config.backend_base_urls = urls;
        }
        self
    }

    /// Override the WebDriver URL
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config.webdriver_url = url.into();
        self
    }

    /// Set an explicit user id, bypassing the credential store
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.config.uid = Some(uid.into());
        self
    }

    /// Override the credential file location
    pub fn with_credentials_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config.credentials_path = Some(path.into());
        self
    }

    /// Set the backend request timeout in seconds
    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.config.request_timeout_secs = seconds;
        self
    }

    /// Extract and match only; nothing is written into the page
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Execute the fill pass.
    ///
    /// Authentication and backend failures abort the pass before anything is
    /// written, so a form is never left half-filled by a pass-level error.
    /// Per-field misses and write failures are collected into the returned
    /// report instead.
    pub async fn run(self) -> Result<FillReport, FillError> {
        let uid = self.resolve_uid()?;

        Url::parse(&self.config.form_url).map_err(|source| FillError::InvalidUrl {
            url: self.config.form_url.clone(),
            source,
        })?;

        let client = browser::connect(&self.config.webdriver_url).await?;
        let result = self.run_with_client(&client, &uid).await;
        browser::close(client).await;
        result
    }

    async fn run_with_client(
        &self,
        client: &fantoccini::Client,
        uid: &str,
    ) -> Result<FillReport, FillError> {
        let html = browser::page_source(client, &self.config.form_url).await?;

        let fields = extract::extract(&html);
        if fields.is_empty() {
            ::log::warn!("No extractable fields on {}", self.config.form_url);
            return Ok(FillReport::new(
                &self.config.form_url,
                self.config.dry_run,
                Vec::new(),
            ));
        }

        let gateway = Gateway::new(
            &self.config.backend_base_urls,
            Duration::from_secs(self.config.request_timeout_secs),
        )?;
        let questions = fields.iter().map(QuestionPayload::from_field).collect();
        let answers = gateway.process_form(uid, questions).await?;
        ::log::info!("Backend returned {} answers", answers.len());

        let matches = matcher::match_fields(&fields, &answers);

        let entries = if self.config.dry_run {
            ::log::info!("Dry run: skipping writes");
            writer::plan(&matches)
        } else {
            let mut runner = WebDriverRunner::new(client);
            writer::write_all(&mut runner, &matches).await
        };

        let report = FillReport::new(&self.config.form_url, self.config.dry_run, entries);
        ::log::info!("{}", report.summary());
        Ok(report)
    }

    /// Resolve the user id: explicit configuration first, then the
    /// credential store (which itself honors the environment override).
    fn resolve_uid(&self) -> Result<String, FillError> {
        if let Some(uid) = &self.config.uid {
            if !uid.is_empty() {
                return Ok(uid.clone());
            }
        }

        let store = match &self.config.credentials_path {
            Some(path) => CredentialStore::new(path),
            None => CredentialStore::new(CredentialStore::default_path()),
        };
        store.load()?.ok_or(FillError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_config() {
        let session = FillSession::new("https://example.com/form")
            .with_backend_urls(vec!["https://api.example.com".to_string()])
            .with_webdriver_url("http://localhost:9515")
            .with_uid("user-1")
            .with_request_timeout(5)
            .with_dry_run(true);

        assert_eq!(
            session.config.backend_base_urls,
            vec!["https://api.example.com"]
        );
        assert_eq!(session.config.webdriver_url, "http://localhost:9515");
        assert_eq!(session.config.uid.as_deref(), Some("user-1"));
        assert_eq!(session.config.request_timeout_secs, 5);
        assert!(session.config.dry_run);
    }

    #[test]
    fn test_empty_backend_urls_keep_defaults() {
        let session = FillSession::new("https://example.com/form").with_backend_urls(Vec::new());
        assert_eq!(
            session.config.backend_base_urls,
            vec!["http://localhost:5000"]
        );
    }

    #[test]
    fn test_resolve_uid_prefers_explicit() {
        let session = FillSession::new("https://example.com/form").with_uid("explicit");
        assert_eq!(session.resolve_uid().unwrap(), "explicit");
    }

    #[test]
    fn test_resolve_uid_unauthenticated() {
        // Point the store at a path that cannot exist so the pass refuses
        // before any network traffic
        let session = FillSession::new("https://example.com/form")
            .with_credentials_path("/nonexistent/formmate/credentials.json");
        assert!(matches!(
            session.resolve_uid(),
            Err(FillError::Unauthenticated)
        ));
    }
}
