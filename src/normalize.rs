//! Question text normalization.
//!
//! Maps free-text question wording onto canonical keys so that a form asking
//! for a "Mobile Number" matches a knowledge-base entry saved under
//! "Contact Number". Both scraped questions and backend-returned questions
//! go through the same function before comparison.

/// Canonical keys and the synonym phrases that map onto them.
///
/// Table order is significant: the first canonical key with a matching
/// synonym wins, so reordering entries changes matching results.
pub const CANONICAL_KEYS: &[(&str, &[&str])] = &[
    (
        "contact number",
        &["phone", "mobile", "cell", "telephone", "contact"],
    ),
    ("name", &["full name", "your name", "first name", "last name"]),
    ("email", &["email address", "email id", "mail"]),
    (
        "location",
        &["city", "current location", "where are you", "where do you live"],
    ),
    ("hometown", &["native place", "home town", "where are you from"]),
    (
        "role",
        &["position", "job title", "designation", "what role", "what position"],
    ),
    (
        "prn",
        &["permanent registration number", "registration number", "roll number"],
    ),
    ("cpi", &["cgpa", "grade", "score", "percentage"]),
    ("branch", &["stream", "course", "specialization", "major"]),
    (
        "joining",
        &[
            "join date",
            "when can you join",
            "how soon can you join",
            "availability",
            "notice period",
            "joining time",
            "joining period",
            "joining duration",
        ],
    ),
];

/// Normalize a question's text into its canonical key.
///
/// Lower-cases, strips everything outside `[a-z0-9\s]`, trims, then replaces
/// the whole text with the first canonical key whose synonym list contains a
/// phrase present in the cleaned text. Texts matching no canonical key come
/// back cleaned but otherwise unchanged, so normalization degrades to
/// as-typed equality.
///
/// Deterministic and idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    let cleaned = cleaned.trim().to_string();

    for (canonical, synonyms) in CANONICAL_KEYS {
        if synonyms.iter().any(|s| cleaned.contains(s)) {
            return (*canonical).to_string();
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_only() {
        assert_eq!(normalize("  What is your PRN?  "), "prn");
        assert_eq!(normalize("Favourite colour!"), "favourite colour");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("***"), "");
    }

    #[test]
    fn test_contact_number_synonyms() {
        let canonical = normalize("Contact Number");
        assert_eq!(canonical, "contact number");
        assert_eq!(normalize("Mobile Number"), canonical);
        assert_eq!(normalize("Contact"), canonical);
        assert_eq!(normalize("phone"), canonical);
        assert_eq!(normalize("Telephone No."), canonical);
    }

    #[test]
    fn test_email_synonyms() {
        assert_eq!(normalize("Email Address"), "email");
        assert_eq!(normalize("Email"), "email");
        assert_eq!(normalize("Mail ID"), "email");
    }

    #[test]
    fn test_table_order_wins() {
        // "contact" appears before "name" in the table, so a text containing
        // synonyms of both resolves to the earlier key.
        assert_eq!(normalize("Contact name"), "contact number");
    }

    #[test]
    fn test_no_match_degrades_to_cleaned_text() {
        assert_eq!(normalize("Describe your project"), "describe your project");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Contact Number",
            "Mobile Number",
            "2. Email Address*",
            "Where do you live?",
            "Native Place",
            "What role are you applying for?",
            "CGPA",
            "Branch / Stream",
            "Notice Period",
            "Describe your project",
            "",
            "   spaces   everywhere   ",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
        // Every canonical key must be a fixed point
        for (canonical, _) in CANONICAL_KEYS {
            assert_eq!(&normalize(canonical), canonical);
        }
    }
}
