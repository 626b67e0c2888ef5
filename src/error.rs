use thiserror::Error;

/// Errors that abort a fill pass.
///
/// Per-field problems (a question with no answer, an element that vanished
/// before write time) are not errors; they are accumulated in the
/// [`FillReport`](crate::report::FillReport) so one bad field never aborts
/// the batch.
#[derive(Debug, Error)]
pub enum FillError {
    /// No stored user id was found before the pass started
    #[error("not authenticated: no stored user id (log in first or pass --uid)")]
    Unauthenticated,

    /// Every candidate backend base URL failed to respond
    #[error("backend unreachable: all {tried} base URLs failed")]
    BackendUnavailable { tried: usize },

    /// The backend responded but refused the request
    #[error("backend rejected the request: {0}")]
    BackendRejected(String),

    /// The backend responded with a payload we could not use
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    /// No WebDriver server could be reached on any candidate URL
    #[error("could not connect to a WebDriver server")]
    WebDriverUnavailable,

    /// A URL in the configuration did not parse
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A WebDriver command failed mid-pass
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    /// An HTTP request to the backend failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem access (config or credential store) failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (config, credentials or response body) failed to parse
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
