//! Backend gateway: posts the extracted questions to the knowledge-base
//! backend and returns its per-question answers.
//!
//! The backend is an opaque collaborator; this module only knows the wire
//! shapes and how to reach it. Deployments have answered with three
//! different body shapes over time (a bare array, an `answers` wrapper, and
//! an error object), so all three are accepted.

use crate::error::FillError;
use crate::extract::Field;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

/// Path of the process-form endpoint under a base URL
const PROCESS_FORM_PATH: &str = "/api/process-form";

/// Base URLs tried after the configured ones, mirroring how the WebDriver
/// connection walks its own fallback list when the primary is unreachable.
const FALLBACK_BASE_URLS: [&str; 3] = [
    "http://127.0.0.1:5000",
    "http://localhost:8000",
    "http://localhost:3000",
];

/// One question as sent to the backend
#[derive(Debug, Clone, Serialize)]
pub struct QuestionPayload {
    pub question: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
}

impl QuestionPayload {
    /// Build the payload entry for an extracted field
    pub fn from_field(field: &Field) -> Self {
        Self {
            question: field.question.clone(),
            field_type: field.kind.name().to_string(),
            required: field.required,
        }
    }
}

/// Request body for the process-form endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ProcessFormRequest {
    pub uid: String,
    pub questions: Vec<QuestionPayload>,
}

/// One backend-returned answer, immutable once parsed
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerRecord {
    /// Question text as echoed back by the backend (casing/whitespace may
    /// differ from the extracted field's text)
    pub question: String,

    /// Value to write; may be empty when the backend had nothing
    #[serde(default)]
    pub answer: String,

    /// Knowledge-base question the backend resolved this from
    #[serde(default)]
    pub matched_question: Option<String>,

    /// Provenance tag (e.g. "database")
    #[serde(default)]
    pub source: Option<String>,

    /// Set when the backend could not resolve an answer for this question
    #[serde(default)]
    pub error: Option<String>,
}

/// The three response shapes the backend is known to produce
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProcessFormResponse {
    Records(Vec<AnswerRecord>),
    Wrapped { answers: Vec<AnswerRecord> },
    Failure { error: String },
}

/// Client for the process-form endpoint with base-URL fallback
#[derive(Debug)]
pub struct Gateway {
    client: reqwest::Client,
    base_urls: Vec<String>,
    request_timeout: Duration,
}

impl Gateway {
    /// Create a gateway over the given base URLs.
    ///
    /// Every configured URL must parse; the built-in fallbacks are appended
    /// after the configured ones, skipping duplicates.
    pub fn new(base_urls: &[String], request_timeout: Duration) -> Result<Self, FillError> {
        let mut urls = Vec::new();
        for base in base_urls {
            Url::parse(base).map_err(|source| FillError::InvalidUrl {
                url: base.clone(),
                source,
            })?;
            let base = base.trim_end_matches('/').to_string();
            if !urls.contains(&base) {
                urls.push(base);
            }
        }
        for fallback in FALLBACK_BASE_URLS {
            if !urls.iter().any(|u| u == fallback) {
                urls.push(fallback.to_string());
            }
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_urls: urls,
            request_timeout,
        })
    }

    /// Post the questions and return the backend's answers.
    ///
    /// Unreachable hosts and timeouts move on to the next base URL; a host
    /// that answers settles the pass, whether it accepted or rejected the
    /// request. All URLs failing is [`FillError::BackendUnavailable`].
    pub async fn process_form(
        &self,
        uid: &str,
        questions: Vec<QuestionPayload>,
    ) -> Result<Vec<AnswerRecord>, FillError> {
        let request = ProcessFormRequest {
            uid: uid.to_string(),
            questions,
        };

        for base in &self.base_urls {
            let endpoint = format!("{}{}", base, PROCESS_FORM_PATH);
            ::log::debug!("Posting {} questions to {}", request.questions.len(), endpoint);

            let attempt = timeout(
                self.request_timeout,
                self.client.post(&endpoint).json(&request).send(),
            )
            .await;

            let response = match attempt {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    ::log::warn!("Backend at {} unreachable: {}", base, e);
                    continue;
                }
                Err(_) => {
                    ::log::warn!("Backend at {} timed out", base);
                    continue;
                }
            };

            let status = response.status();
            let body = response.text().await?;

            if !status.is_success() {
                // The backend was reached and said no; fallbacks would see
                // the same user's data, so stop here.
                let message = serde_json::from_str::<ProcessFormResponse>(&body)
                    .ok()
                    .and_then(|r| match r {
                        ProcessFormResponse::Failure { error } => Some(error),
                        _ => None,
                    })
                    .unwrap_or_else(|| format!("HTTP {}", status));
                return Err(FillError::BackendRejected(message));
            }

            ::log::info!("Backend at {} answered with HTTP {}", base, status);
            return parse_answers(&body);
        }

        Err(FillError::BackendUnavailable {
            tried: self.base_urls.len(),
        })
    }
}

/// Parse a successful response body into answer records
fn parse_answers(body: &str) -> Result<Vec<AnswerRecord>, FillError> {
    let parsed: ProcessFormResponse = serde_json::from_str(body)
        .map_err(|e| FillError::MalformedResponse(e.to_string()))?;

    let records = match parsed {
        ProcessFormResponse::Records(records) => records,
        ProcessFormResponse::Wrapped { answers } => answers,
        ProcessFormResponse::Failure { error } => return Err(FillError::BackendRejected(error)),
    };

    if records.is_empty() {
        return Err(FillError::MalformedResponse(
            "backend returned no answers".to_string(),
        ));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let body = r#"[
            {"question": "Email", "answer": "a@b.com", "source": "database"},
            {"question": "PRN", "answer": "", "error": "No answer found in knowledge base."}
        ]"#;
        let records = parse_answers(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "Email");
        assert_eq!(records[0].answer, "a@b.com");
        assert_eq!(records[0].source.as_deref(), Some("database"));
        assert_eq!(
            records[1].error.as_deref(),
            Some("No answer found in knowledge base.")
        );
    }

    #[test]
    fn test_parse_wrapped_answers() {
        let body = r#"{"answers": [{"question": "Name", "answer": "Ada"}]}"#;
        let records = parse_answers(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].answer, "Ada");
        assert_eq!(records[0].matched_question, None);
    }

    #[test]
    fn test_parse_error_object() {
        let body = r#"{"error": "No user ID provided"}"#;
        match parse_answers(body) {
            Err(FillError::BackendRejected(message)) => {
                assert_eq!(message, "No user ID provided");
            }
            other => panic!("expected BackendRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty_array_is_malformed() {
        assert!(matches!(
            parse_answers("[]"),
            Err(FillError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        assert!(matches!(
            parse_answers("not json"),
            Err(FillError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_answers(r#"{"unexpected": true}"#),
            Err(FillError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_gateway_url_validation_and_dedup() {
        let gateway = Gateway::new(
            &[
                "http://localhost:5000/".to_string(),
                "http://127.0.0.1:5000".to_string(),
            ],
            Duration::from_secs(5),
        )
        .unwrap();
        // Trailing slash trimmed, configured URLs first, fallbacks appended
        // without duplicating 127.0.0.1:5000
        assert_eq!(gateway.base_urls[0], "http://localhost:5000");
        assert_eq!(gateway.base_urls[1], "http://127.0.0.1:5000");
        assert_eq!(
            gateway.base_urls.len(),
            2 + FALLBACK_BASE_URLS.len() - 1
        );

        assert!(matches!(
            Gateway::new(&["not a url".to_string()], Duration::from_secs(5)),
            Err(FillError::InvalidUrl { .. })
        ));
    }
}
