use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ExtractedFields;

/// The label tokens the upstream free-text convention uses. Every
/// field value runs from its label to the next known label or end of
/// string; a value that happens to contain a label verbatim gets
/// truncated there. That truncation mirrors the upstream convention
/// and is kept as-is.
const FIELD_LABELS: &[&str] = &[
    "User:",
    "Deployment:",
    "STT:",
    "Category:",
    "Issue:",
    "Comments:",
    "Agent ID:",
];

/// Marker token preceding the reporter email when it is embedded in
/// the ticket title instead of an explicit `User:` field.
const TITLE_EMAIL_MARKER: &str = "GleanChat:";

fn field_regex(label: &str) -> Regex {
    let boundary = FIELD_LABELS
        .iter()
        .map(|l| regex::escape(l))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?s){}\s*(.*?)\s*(?:{}|$)",
        regex::escape(label),
        boundary
    ))
    .expect("field extraction pattern must compile")
}

static USER_RE: Lazy<Regex> = Lazy::new(|| field_regex("User:"));
static DEPLOYMENT_RE: Lazy<Regex> = Lazy::new(|| field_regex("Deployment:"));
static STT_RE: Lazy<Regex> = Lazy::new(|| field_regex("STT:"));
static CATEGORY_RE: Lazy<Regex> = Lazy::new(|| field_regex("Category:"));
static ISSUE_RE: Lazy<Regex> = Lazy::new(|| field_regex("Issue:"));
static COMMENTS_RE: Lazy<Regex> = Lazy::new(|| field_regex("Comments:"));
static AGENT_ID_RE: Lazy<Regex> = Lazy::new(|| field_regex("Agent ID:"));

static TITLE_EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{}\s*([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{{2,}})",
        regex::escape(TITLE_EMAIL_MARKER)
    ))
    .expect("title email pattern must compile")
});

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|caps| caps[1].trim().to_string())
}

/// Applies the independent per-field extractions over the snippet
/// texts joined with a single space. Extractions are non-exclusive;
/// any subset of fields may come back. Falls back to a title-embedded
/// email only when no explicit `User:` field matched.
pub fn extract_fields(snippet_texts: &[&str], title: &str) -> ExtractedFields {
    let text = snippet_texts.join(" ");

    let mut fields = ExtractedFields {
        deployment: capture(&DEPLOYMENT_RE, &text),
        user: capture(&USER_RE, &text),
        stt: capture(&STT_RE, &text),
        category: capture(&CATEGORY_RE, &text),
        issue_type: capture(&ISSUE_RE, &text),
        comments: capture(&COMMENTS_RE, &text),
        agent_id: capture(&AGENT_ID_RE, &text),
    };

    if fields.user.is_none() {
        fields.user = capture(&TITLE_EMAIL_RE, title);
    }

    fields
}
