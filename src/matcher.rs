//! Answer matching: resolves each extracted field to at most one backend
//! answer, then resolves choice fields down to a concrete option.

use crate::extract::{ChoiceOption, Field, FieldKind};
use crate::gateway::AnswerRecord;
use crate::normalize::normalize;

/// How a field was paired with its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Question texts were equal as extracted
    Exact,
    /// Question texts were equal after normalization
    Normalized,
    /// Paired through an option label containing the answer value
    OptionPartial,
}

impl MatchKind {
    pub fn name(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Normalized => "normalized",
            MatchKind::OptionPartial => "option-partial",
        }
    }
}

/// The concrete write the writer should perform for a field
#[derive(Debug, Clone, PartialEq)]
pub enum FillAction {
    /// Set a text/textarea value, dispatching input then change
    SetText(String),
    /// Select the option with this underlying value, dispatching change
    SelectOption { value: String },
    /// Check the radio input with this value, dispatching change on it
    CheckRadio { value: String },
    /// Set a checkbox's checked state, dispatching change
    SetChecked(bool),
}

/// Resolution of one field after matching
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// An answer was found and resolved to a concrete write
    Fill { action: FillAction, kind: MatchKind },
    /// The backend (or option resolution) produced a per-field message;
    /// nothing is written for this field
    Diagnostic { message: String },
    /// No answer matched; recorded, not an error
    Miss,
}

/// One field paired with its match outcome
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    pub field_id: String,
    pub question: String,
    pub outcome: MatchOutcome,
}

/// Words whose (case-insensitive) presence as the whole answer means a
/// checkbox should be checked; anything else means unchecked.
const TRUTHY_WORDS: [&str; 3] = ["yes", "true", "1"];

/// Interpret a textual answer as a checkbox state
pub fn truthy(answer: &str) -> bool {
    let lowered = answer.trim().to_lowercase();
    TRUTHY_WORDS.contains(&lowered.as_str())
}

/// Match extracted fields against backend answers.
///
/// Policy per field, first success wins:
/// 1. exact question text equality, as extracted;
/// 2. normalized question equality;
/// 3. for radio/select only, pairing by answer value: the first answer whose
///    value resolves against the field's options.
///
/// Answers are not consumed: two fields asking the same question both pair
/// with the same record. Output order follows field order.
pub fn match_fields(fields: &[Field], answers: &[AnswerRecord]) -> Vec<FieldMatch> {
    fields
        .iter()
        .map(|field| {
            let outcome = match_field(field, answers);
            ::log::debug!("Field '{}' matched as {:?}", field.question, outcome);
            FieldMatch {
                field_id: field.field_id.clone(),
                question: field.question.clone(),
                outcome,
            }
        })
        .collect()
}

fn match_field(field: &Field, answers: &[AnswerRecord]) -> MatchOutcome {
    if let Some(answer) = answers.iter().find(|a| a.question == field.question) {
        return resolve(field, answer, MatchKind::Exact);
    }

    let key = normalize(&field.question);
    if let Some(answer) = answers.iter().find(|a| normalize(&a.question) == key) {
        return resolve(field, answer, MatchKind::Normalized);
    }

    // Choice fields get one more chance: pair by the answer value itself
    if let Some(options) = field.kind.options() {
        for answer in answers {
            if answer.error.is_none()
                && !answer.answer.is_empty()
                && resolve_option(options, &answer.answer).is_some()
            {
                return resolve(field, answer, MatchKind::OptionPartial);
            }
        }
    }

    MatchOutcome::Miss
}

/// Turn a paired (field, answer) into a concrete write, or a diagnostic
fn resolve(field: &Field, answer: &AnswerRecord, kind: MatchKind) -> MatchOutcome {
    if let Some(error) = &answer.error {
        return MatchOutcome::Diagnostic {
            message: error.clone(),
        };
    }
    if answer.answer.is_empty() {
        return MatchOutcome::Miss;
    }

    match &field.kind {
        FieldKind::Text | FieldKind::Textarea => MatchOutcome::Fill {
            action: FillAction::SetText(answer.answer.clone()),
            kind,
        },
        FieldKind::Select { options } => match resolve_option(options, &answer.answer) {
            Some(option) => MatchOutcome::Fill {
                action: FillAction::SelectOption {
                    value: option.value.clone(),
                },
                kind,
            },
            None => MatchOutcome::Diagnostic {
                message: format!("no select option matches \"{}\"", answer.answer),
            },
        },
        FieldKind::Radio { options } => match resolve_option(options, &answer.answer) {
            Some(option) => MatchOutcome::Fill {
                action: FillAction::CheckRadio {
                    value: option.value.clone(),
                },
                kind,
            },
            None => MatchOutcome::Diagnostic {
                message: format!("no radio option matches \"{}\"", answer.answer),
            },
        },
        FieldKind::Checkbox => MatchOutcome::Fill {
            action: FillAction::SetChecked(truthy(&answer.answer)),
            kind,
        },
    }
}

/// Resolve an answer string against a field's options.
///
/// First option whose label or value is case-insensitively equal wins; then
/// the first option whose label contains the answer as a substring. Ties are
/// broken by DOM order, with no scoring among multiple partial matches.
fn resolve_option<'a>(options: &'a [ChoiceOption], answer: &str) -> Option<&'a ChoiceOption> {
    let want = answer.trim().to_lowercase();
    if want.is_empty() {
        return None;
    }

    options
        .iter()
        .find(|o| o.label.trim().to_lowercase() == want || o.value.trim().to_lowercase() == want)
        .or_else(|| {
            options
                .iter()
                .find(|o| o.label.to_lowercase().contains(&want))
        })
}
