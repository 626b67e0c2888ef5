use serde::Serialize;

/// Final state of one field after the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    /// The answer was written into the page
    Filled,
    /// A fill was resolved but not written (dry run)
    Planned,
    /// No answer matched this field
    Missed,
    /// The backend or option resolution left a per-field message
    Diagnostic,
    /// The write failed, usually because the element was gone
    WriteFailed,
}

/// Per-field entry of a fill report
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub question: String,
    pub field_id: String,
    pub status: FieldStatus,
    /// Match kind for fills, message for diagnostics and failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregated result of one fill pass.
///
/// Per-field problems are collected here and reported once at the end of
/// the pass instead of interrupting it.
#[derive(Debug, Clone, Serialize)]
pub struct FillReport {
    pub form_url: String,
    pub dry_run: bool,
    pub total_fields: usize,
    pub filled: usize,
    pub missed: usize,
    pub diagnostics: usize,
    pub write_failures: usize,
    pub fields: Vec<FieldReport>,
}

impl FillReport {
    /// Build a report from per-field entries, computing the counters
    pub fn new(form_url: &str, dry_run: bool, fields: Vec<FieldReport>) -> Self {
        let count = |status: FieldStatus| fields.iter().filter(|f| f.status == status).count();
        Self {
            form_url: form_url.to_string(),
            dry_run,
            total_fields: fields.len(),
            filled: count(FieldStatus::Filled) + count(FieldStatus::Planned),
            missed: count(FieldStatus::Missed),
            diagnostics: count(FieldStatus::Diagnostic),
            write_failures: count(FieldStatus::WriteFailed),
            fields,
        }
    }

    /// One-line human summary for the end of the pass
    pub fn summary(&self) -> String {
        format!(
            "{} {}/{} fields ({} missed, {} diagnostics, {} write failures)",
            if self.dry_run { "Would fill" } else { "Filled" },
            self.filled,
            self.total_fields,
            self.missed,
            self.diagnostics,
            self.write_failures
        )
    }
}
