//! Selector strategies for locating questions in inconsistent form markup.
//!
//! Google Forms has rendered the same form with several different DOM
//! shapes over time (ARIA roles on current pages, `freebird*` class names on
//! older ones). Each lookup is expressed as an ordered list of strategies
//! tried in sequence; the first one that produces a result wins.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// One named selector in a fallback chain
pub struct SelectorStrategy {
    pub name: &'static str,
    selector: Selector,
}

impl SelectorStrategy {
    fn new(name: &'static str, css: &str) -> Self {
        Self {
            name,
            selector: Selector::parse(css).expect("Strategy selector should be valid"),
        }
    }
}

/// Ordered strategies for locating question item containers
pub fn item_strategies() -> Vec<SelectorStrategy> {
    vec![
        SelectorStrategy::new("aria-listitem-in-form", r#"form div[role="listitem"]"#),
        SelectorStrategy::new("aria-listitem", r#"div[role="listitem"]"#),
        SelectorStrategy::new(
            "legacy-item-class",
            "div.freebirdFormviewerViewItemsItemItem",
        ),
    ]
}

/// Ordered strategies for locating the heading/label inside an item
pub fn heading_strategies() -> Vec<SelectorStrategy> {
    vec![
        SelectorStrategy::new("aria-heading", r#"div[role="heading"]"#),
        SelectorStrategy::new(
            "legacy-title-class",
            ".freebirdFormviewerViewItemsItemItemTitle",
        ),
        SelectorStrategy::new("label-element", "label"),
    ]
}

/// Find all question item containers in the document.
///
/// Strategies are tried in priority order; the first one yielding at least
/// one container wins and the rest are never consulted, so a page mixing
/// markup generations is read consistently.
pub fn find_items(doc: &Html) -> Vec<ElementRef<'_>> {
    for strategy in item_strategies() {
        let items: Vec<ElementRef> = doc.select(&strategy.selector).collect();
        if !items.is_empty() {
            ::log::debug!(
                "Item strategy '{}' matched {} containers",
                strategy.name,
                items.len()
            );
            return items;
        }
    }
    ::log::debug!("No item strategy matched any containers");
    Vec::new()
}

/// Locate the raw (uncleaned) question text for an item container.
///
/// Falls back to the `aria-label` of the item's own input when no heading
/// element exists. Returns `None` when no strategy finds text; such an item
/// cannot be matched to an answer later and is skipped by the extractor.
pub fn heading_text(item: ElementRef<'_>) -> Option<String> {
    for strategy in heading_strategies() {
        if let Some(heading) = item.select(&strategy.selector).next() {
            let text = collapse_whitespace(&heading.text().collect::<String>());
            if !text.is_empty() {
                ::log::trace!("Heading strategy '{}' matched: {}", strategy.name, text);
                return Some(text);
            }
        }
    }

    // Last resort: the input may describe itself
    let input_selector =
        Selector::parse("input, textarea, select").expect("Strategy selector should be valid");
    for input in item.select(&input_selector) {
        if let Some(label) = input.value().attr("aria-label") {
            let text = collapse_whitespace(label);
            if !text.is_empty() {
                ::log::trace!("Heading fallback 'aria-label' matched: {}", text);
                return Some(text);
            }
        }
    }

    None
}

/// Best-effort label for a single radio input.
///
/// Searches spans in the radio's enclosing elements (up to two levels up),
/// then the next sibling's text, then the parent's own text. The two-level
/// cap keeps the search from straying into neighbouring options.
pub fn radio_label(radio: ElementRef<'_>) -> String {
    let span_selector = Selector::parse("span").expect("Strategy selector should be valid");

    let mut parent = radio
        .parent()
        .and_then(ElementRef::wrap);
    for _ in 0..2 {
        let Some(scope) = parent else { break };
        for span in scope.select(&span_selector) {
            let text = collapse_whitespace(&span.text().collect::<String>());
            if !text.is_empty() {
                return text;
            }
        }
        parent = scope.parent().and_then(ElementRef::wrap);
    }

    // Fallback: next sibling element text
    for sibling in radio.next_siblings() {
        if let Some(el) = ElementRef::wrap(sibling) {
            let text = collapse_whitespace(&el.text().collect::<String>());
            if !text.is_empty() {
                return text;
            }
        }
    }

    // Fallback: the radio's own parent text
    if let Some(parent) = radio.parent().and_then(ElementRef::wrap) {
        return collapse_whitespace(&parent.text().collect::<String>());
    }

    String::new()
}

/// Cleans question decoration out of a raw heading text
#[derive(Debug)]
pub struct LabelCleaner {
    decoration: Regex,
    required_marker: Regex,
    ordinal_prefix: Regex,
}

impl Default for LabelCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelCleaner {
    pub fn new() -> Self {
        Self {
            decoration: Regex::new(r"[•*]").expect("Cleanup patterns should be valid"),
            required_marker: Regex::new(r"\*$").expect("Cleanup patterns should be valid"),
            ordinal_prefix: Regex::new(r"^\d+\.\s*").expect("Cleanup patterns should be valid"),
        }
    }

    /// Strip bullet/asterisk decoration, a trailing required-marker asterisk
    /// and a leading "N. " ordinal prefix, trimming at each step.
    pub fn clean(&self, raw: &str) -> String {
        let text = self.decoration.replace_all(raw, "");
        let text = text.trim();
        let text = self.required_marker.replace(text, "");
        let text = text.trim();
        let text = self.ordinal_prefix.replace(text, "");
        text.trim().to_string()
    }
}

/// Collapse runs of whitespace into single spaces and trim
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
