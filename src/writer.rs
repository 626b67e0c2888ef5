//! Field writer: pushes resolved answers into the live page.
//!
//! Each write is a small JavaScript snippet executed in the page through a
//! [`ScriptRunner`], so the host page's own listeners observe the same
//! `input`/`change` events a typing user would produce. A snippet returns
//! `true` when it found and updated its target element; a missing element is
//! recorded as a per-field failure and never aborts the remaining writes.

use crate::error::FillError;
use crate::matcher::{FieldMatch, FillAction, MatchOutcome};
use crate::report::{FieldReport, FieldStatus};
use serde_json::Value;

/// Seam for executing JavaScript in the page. The production implementation
/// wraps a WebDriver client; tests substitute a recording mock.
#[allow(async_fn_in_trait)]
pub trait ScriptRunner {
    async fn run(&mut self, script: &str, args: Vec<Value>) -> Result<Value, FillError>;
}

/// [`ScriptRunner`] over a live fantoccini client
pub struct WebDriverRunner<'a> {
    client: &'a fantoccini::Client,
}

impl<'a> WebDriverRunner<'a> {
    pub fn new(client: &'a fantoccini::Client) -> Self {
        Self { client }
    }
}

impl ScriptRunner for WebDriverRunner<'_> {
    async fn run(&mut self, script: &str, args: Vec<Value>) -> Result<Value, FillError> {
        Ok(self.client.execute(script, args).await?)
    }
}

// Elements are re-located by name first, then id, matching how field ids
// were captured at extraction time.

const SET_TEXT_SCRIPT: &str = r#"
var el = document.getElementsByName(arguments[0])[0] || document.getElementById(arguments[0]);
if (!el) { return false; }
el.value = arguments[1];
el.dispatchEvent(new Event('input', { bubbles: true }));
el.dispatchEvent(new Event('change', { bubbles: true }));
return true;
"#;

const SELECT_OPTION_SCRIPT: &str = r#"
var el = document.getElementsByName(arguments[0])[0] || document.getElementById(arguments[0]);
if (!el || !el.options) { return false; }
for (var i = 0; i < el.options.length; i++) {
    if (el.options[i].value === arguments[1]) {
        el.value = arguments[1];
        el.dispatchEvent(new Event('change', { bubbles: true }));
        return true;
    }
}
return false;
"#;

// The change event is dispatched on the matched radio input itself, not on
// the group container.
const CHECK_RADIO_SCRIPT: &str = r#"
var els = document.getElementsByName(arguments[0]);
for (var i = 0; i < els.length; i++) {
    if (els[i].value === arguments[1]) {
        els[i].checked = true;
        els[i].dispatchEvent(new Event('change', { bubbles: true }));
        return true;
    }
}
return false;
"#;

const SET_CHECKED_SCRIPT: &str = r#"
var el = document.getElementsByName(arguments[0])[0] || document.getElementById(arguments[0]);
if (!el) { return false; }
el.checked = arguments[1];
el.dispatchEvent(new Event('change', { bubbles: true }));
return true;
"#;

/// Script and arguments for one fill action
fn script_for(field_id: &str, action: &FillAction) -> (&'static str, Vec<Value>) {
    let id = Value::String(field_id.to_string());
    match action {
        FillAction::SetText(value) => (SET_TEXT_SCRIPT, vec![id, Value::String(value.clone())]),
        FillAction::SelectOption { value } => {
            (SELECT_OPTION_SCRIPT, vec![id, Value::String(value.clone())])
        }
        FillAction::CheckRadio { value } => {
            (CHECK_RADIO_SCRIPT, vec![id, Value::String(value.clone())])
        }
        FillAction::SetChecked(checked) => (SET_CHECKED_SCRIPT, vec![id, Value::Bool(*checked)]),
    }
}

/// Human description of an action, used in dry-run reports
fn describe(action: &FillAction) -> String {
    match action {
        FillAction::SetText(value) => format!("set value to \"{}\"", value),
        FillAction::SelectOption { value } => format!("select option \"{}\"", value),
        FillAction::CheckRadio { value } => format!("check radio option \"{}\"", value),
        FillAction::SetChecked(true) => "check".to_string(),
        FillAction::SetChecked(false) => "uncheck".to_string(),
    }
}

/// Write every resolved fill into the page, one field at a time.
///
/// Misses and diagnostics pass through untouched. A write that fails (the
/// element is gone, or the WebDriver command errors) is recorded for that
/// field and processing continues with the rest of the batch.
pub async fn write_all<R: ScriptRunner>(
    runner: &mut R,
    matches: &[FieldMatch],
) -> Vec<FieldReport> {
    let mut reports = Vec::with_capacity(matches.len());

    for m in matches {
        let report = match &m.outcome {
            MatchOutcome::Fill { action, kind } => {
                let (script, args) = script_for(&m.field_id, action);
                match runner.run(script, args).await {
                    Ok(Value::Bool(true)) => {
                        ::log::debug!("Filled '{}' ({})", m.question, kind.name());
                        FieldReport {
                            question: m.question.clone(),
                            field_id: m.field_id.clone(),
                            status: FieldStatus::Filled,
                            detail: Some(kind.name().to_string()),
                        }
                    }
                    Ok(_) => {
                        ::log::warn!(
                            "Element '{}' for '{}' not found at write time",
                            m.field_id,
                            m.question
                        );
                        FieldReport {
                            question: m.question.clone(),
                            field_id: m.field_id.clone(),
                            status: FieldStatus::WriteFailed,
                            detail: Some("target element not found".to_string()),
                        }
                    }
                    Err(e) => {
                        ::log::warn!("Write for '{}' failed: {}", m.question, e);
                        FieldReport {
                            question: m.question.clone(),
                            field_id: m.field_id.clone(),
                            status: FieldStatus::WriteFailed,
                            detail: Some(e.to_string()),
                        }
                    }
                }
            }
            MatchOutcome::Diagnostic { message } => FieldReport {
                question: m.question.clone(),
                field_id: m.field_id.clone(),
                status: FieldStatus::Diagnostic,
                detail: Some(message.clone()),
            },
            MatchOutcome::Miss => FieldReport {
                question: m.question.clone(),
                field_id: m.field_id.clone(),
                status: FieldStatus::Missed,
                detail: None,
            },
        };
        reports.push(report);
    }

    reports
}

/// Dry-run counterpart of [`write_all`]: resolved fills become planned
/// entries and nothing touches the page.
pub fn plan(matches: &[FieldMatch]) -> Vec<FieldReport> {
    matches
        .iter()
        .map(|m| match &m.outcome {
            MatchOutcome::Fill { action, kind } => FieldReport {
                question: m.question.clone(),
                field_id: m.field_id.clone(),
                status: FieldStatus::Planned,
                detail: Some(format!("{} ({})", describe(action), kind.name())),
            },
            MatchOutcome::Diagnostic { message } => FieldReport {
                question: m.question.clone(),
                field_id: m.field_id.clone(),
                status: FieldStatus::Diagnostic,
                detail: Some(message.clone()),
            },
            MatchOutcome::Miss => FieldReport {
                question: m.question.clone(),
                field_id: m.field_id.clone(),
                status: FieldStatus::Missed,
                detail: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchKind;
    use std::collections::HashSet;

    /// Records every script execution; ids in `missing` report not-found,
    /// ids in `broken` error like a lost WebDriver session.
    struct MockRunner {
        calls: Vec<(String, Vec<Value>)>,
        missing: HashSet<String>,
        broken: HashSet<String>,
    }

    impl MockRunner {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                missing: HashSet::new(),
                broken: HashSet::new(),
            }
        }

        fn field_id(args: &[Value]) -> String {
            args[0].as_str().unwrap_or_default().to_string()
        }
    }

    impl ScriptRunner for MockRunner {
        async fn run(&mut self, script: &str, args: Vec<Value>) -> Result<Value, FillError> {
            let id = Self::field_id(&args);
            self.calls.push((script.to_string(), args));
            if self.broken.contains(&id) {
                return Err(FillError::Io(std::io::Error::other("session lost")));
            }
            Ok(Value::Bool(!self.missing.contains(&id)))
        }
    }

    fn fill(field_id: &str, action: FillAction) -> FieldMatch {
        FieldMatch {
            field_id: field_id.to_string(),
            question: format!("Question {field_id}"),
            outcome: MatchOutcome::Fill {
                action,
                kind: MatchKind::Exact,
            },
        }
    }

    #[tokio::test]
    async fn test_partial_failure_isolation() {
        // Five fields; #3's element is gone at write time
        let matches: Vec<FieldMatch> = (1..=5)
            .map(|i| fill(&format!("f{i}"), FillAction::SetText(format!("v{i}"))))
            .collect();
        let mut runner = MockRunner::new();
        runner.missing.insert("f3".to_string());

        let reports = write_all(&mut runner, &matches).await;

        assert_eq!(runner.calls.len(), 5, "every field must be attempted");
        let statuses: Vec<FieldStatus> = reports.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                FieldStatus::Filled,
                FieldStatus::Filled,
                FieldStatus::WriteFailed,
                FieldStatus::Filled,
                FieldStatus::Filled,
            ]
        );
        assert_eq!(
            reports[2].detail.as_deref(),
            Some("target element not found")
        );
    }

    #[tokio::test]
    async fn test_runner_error_does_not_abort_batch() {
        let matches = vec![
            fill("f1", FillAction::SetText("a".to_string())),
            fill("f2", FillAction::SetText("b".to_string())),
            fill("f3", FillAction::SetText("c".to_string())),
        ];
        let mut runner = MockRunner::new();
        runner.broken.insert("f2".to_string());

        let reports = write_all(&mut runner, &matches).await;

        assert_eq!(runner.calls.len(), 3);
        assert_eq!(reports[0].status, FieldStatus::Filled);
        assert_eq!(reports[1].status, FieldStatus::WriteFailed);
        assert_eq!(reports[2].status, FieldStatus::Filled);
    }

    #[tokio::test]
    async fn test_text_script_fires_input_then_change_once_each() {
        let matches = vec![fill("f1", FillAction::SetText("a@b.com".to_string()))];
        let mut runner = MockRunner::new();
        write_all(&mut runner, &matches).await;

        let (script, args) = &runner.calls[0];
        assert_eq!(script.matches("new Event('input'").count(), 1);
        assert_eq!(script.matches("new Event('change'").count(), 1);
        let input_at = script.find("new Event('input'").unwrap();
        let change_at = script.find("new Event('change'").unwrap();
        assert!(input_at < change_at, "input must fire before change");
        assert!(script.contains("bubbles: true"));
        assert_eq!(args[1], Value::String("a@b.com".to_string()));
    }

    #[tokio::test]
    async fn test_radio_script_dispatches_on_matched_element() {
        let matches = vec![fill(
            "entry.103",
            FillAction::CheckRadio {
                value: "Female".to_string(),
            },
        )];
        let mut runner = MockRunner::new();
        write_all(&mut runner, &matches).await;

        let (script, args) = &runner.calls[0];
        assert!(script.contains("els[i].checked = true"));
        assert!(script.contains("els[i].dispatchEvent"));
        assert_eq!(args[1], Value::String("Female".to_string()));
    }

    #[tokio::test]
    async fn test_checkbox_script_receives_boolean() {
        let matches = vec![fill("f1", FillAction::SetChecked(true))];
        let mut runner = MockRunner::new();
        write_all(&mut runner, &matches).await;
        assert_eq!(runner.calls[0].1[1], Value::Bool(true));
    }

    #[tokio::test]
    async fn test_misses_and_diagnostics_do_not_touch_the_page() {
        let matches = vec![
            FieldMatch {
                field_id: "f1".to_string(),
                question: "Q1".to_string(),
                outcome: MatchOutcome::Miss,
            },
            FieldMatch {
                field_id: "f2".to_string(),
                question: "Q2".to_string(),
                outcome: MatchOutcome::Diagnostic {
                    message: "no answer".to_string(),
                },
            },
        ];
        let mut runner = MockRunner::new();
        let reports = write_all(&mut runner, &matches).await;

        assert!(runner.calls.is_empty());
        assert_eq!(reports[0].status, FieldStatus::Missed);
        assert_eq!(reports[1].status, FieldStatus::Diagnostic);
        assert_eq!(reports[1].detail.as_deref(), Some("no answer"));
    }

    #[test]
    fn test_plan_marks_fills_as_planned() {
        let matches = vec![
            fill("f1", FillAction::SetText("v".to_string())),
            FieldMatch {
                field_id: "f2".to_string(),
                question: "Q2".to_string(),
                outcome: MatchOutcome::Miss,
            },
        ];
        let reports = plan(&matches);
        assert_eq!(reports[0].status, FieldStatus::Planned);
        assert_eq!(
            reports[0].detail.as_deref(),
            Some("set value to \"v\" (exact)")
        );
        assert_eq!(reports[1].status, FieldStatus::Missed);
    }
}
