//! Question extraction: a read-only walk over a form's DOM that produces one
//! [`Field`] per answerable question.

pub mod strategy;


use scraper::{ElementRef, Html, Selector};
use strategy::LabelCleaner;

/// One selectable option of a radio group or select element.
///
/// `value` is the underlying form value used to re-locate the option's
/// element at write time; `label` is the user-visible text that answers are
/// matched against.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

/// Classified input type of a field, with options carried by the choice
/// kinds so that option handling cannot be forgotten in a match arm.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Textarea,
    Select { options: Vec<ChoiceOption> },
    Radio { options: Vec<ChoiceOption> },
    Checkbox,
}

impl FieldKind {
    /// Wire name of the kind, as sent to the backend
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea => "textarea",
            FieldKind::Select { .. } => "select",
            FieldKind::Radio { .. } => "radio",
            FieldKind::Checkbox => "checkbox",
        }
    }

    /// Options of a choice kind, if any
    pub fn options(&self) -> Option<&[ChoiceOption]> {
        match self {
            FieldKind::Select { options } | FieldKind::Radio { options } => Some(options),
            _ => None,
        }
    }
}

/// One answerable unit extracted from the page.
///
/// Created fresh on every extraction pass and discarded when the fill pass
/// completes. `field_id` (the element's `name` or `id`) is what re-locates
/// the element at write time, assuming the DOM has not mutated in between.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub question: String,
    pub field_id: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// Compiled selectors used during one extraction pass
struct Selectors {
    radio: Selector,
    any_input: Selector,
    option: Selector,
}

impl Selectors {
    fn new() -> Self {
        Self {
            radio: Selector::parse(r#"input[type="radio"]"#)
                .expect("Extractor selectors should be valid"),
            any_input: Selector::parse("input, textarea, select")
                .expect("Extractor selectors should be valid"),
            option: Selector::parse("option").expect("Extractor selectors should be valid"),
        }
    }
}

/// Extract all answerable fields from a page's HTML, in document order.
///
/// Containers without a locatable heading, and inputs without a `name` or
/// `id` to re-locate them by, are skipped (they could never be matched or
/// written). A page with nothing extractable yields an empty vector, not an
/// error; the caller decides whether that is fatal.
pub fn extract(html: &str) -> Vec<Field> {
    let doc = Html::parse_document(html);
    let selectors = Selectors::new();
    let cleaner = LabelCleaner::new();

    let mut fields = Vec::new();

    for item in strategy::find_items(&doc) {
        let Some(raw) = strategy::heading_text(item) else {
            ::log::debug!("Skipping item with no locatable heading");
            continue;
        };
        let question = cleaner.clean(&raw);
        if question.is_empty() {
            ::log::debug!("Skipping item whose heading is all decoration: {:?}", raw);
            continue;
        }

        // A group of same-named radios collapses into one field
        let radios: Vec<ElementRef> = item.select(&selectors.radio).collect();
        if !radios.is_empty() {
            if let Some(field) = radio_field(&question, &radios, item) {
                ::log::debug!(
                    "Extracted radio field '{}' with {} options",
                    field.question,
                    field.kind.options().map_or(0, |o| o.len())
                );
                fields.push(field);
            }
            continue;
        }

        let Some(input) = item.select(&selectors.any_input).next() else {
            ::log::debug!("Skipping item with no input element: {}", question);
            continue;
        };
        let Some(field_id) = element_id(input) else {
            ::log::debug!("Skipping field without name or id: {}", question);
            continue;
        };

        let kind = classify(input, &selectors);
        let required = required_flag(item, input);
        ::log::debug!("Extracted {} field: {}", kind.name(), question);
        fields.push(Field {
            question,
            field_id,
            kind,
            required,
        });
    }

    ::log::info!("Extracted {} fields", fields.len());
    fields
}

/// Collapse a container's radio inputs into a single radio field
fn radio_field(question: &str, radios: &[ElementRef], item: ElementRef) -> Option<Field> {
    let field_id = radios.iter().find_map(|r| element_id(*r))?;

    let options = radios
        .iter()
        .map(|radio| {
            let label = strategy::radio_label(*radio);
            // A radio with no value attribute submits "on", like the DOM does
            let value = radio
                .value()
                .attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| "on".to_string());
            ChoiceOption { label, value }
        })
        .collect();

    Some(Field {
        question: question.to_string(),
        field_id,
        kind: FieldKind::Radio { options },
        required: required_flag(item, radios[0]),
    })
}

/// Classify a single input/textarea/select element into a [`FieldKind`].
///
/// Unrecognized input types (email, url, date, ...) behave as plain value
/// carriers and classify as text.
fn classify(input: ElementRef, selectors: &Selectors) -> FieldKind {
    match input.value().name() {
        "textarea" => FieldKind::Textarea,
        "select" => FieldKind::Select {
            options: select_options(input, selectors),
        },
        _ => match input.value().attr("type") {
            Some("checkbox") => FieldKind::Checkbox,
            _ => FieldKind::Text,
        },
    }
}

/// Enumerate a select element's options in DOM order
fn select_options(select: ElementRef, selectors: &Selectors) -> Vec<ChoiceOption> {
    select
        .select(&selectors.option)
        .map(|opt| {
            let label = opt.text().collect::<String>().trim().to_string();
            // An option with no value attribute submits its text
            let value = opt
                .value()
                .attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| label.clone());
            ChoiceOption { label, value }
        })
        .collect()
}

/// Stable identifier used to re-locate the element at write time
fn element_id(el: ElementRef) -> Option<String> {
    el.value()
        .attr("name")
        .or_else(|| el.value().attr("id"))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Best-effort required flag from DOM attributes
fn required_flag(item: ElementRef, input: ElementRef) -> bool {
    input.value().attr("required").is_some()
        || input.value().attr("aria-required") == Some("true")
        || item.value().attr("aria-required") == Some("true")
}
