use std::collections::HashSet;

use chrono::DateTime;
use common::consts::MISSING_DATE;
use gleanapi::{walk_matches, RawMatch};
use tracing::warn;

use crate::pipeline::extract::extract_fields;
use crate::types::{FeedbackRecord, Sentiment};

/// Walks every match at all three nesting depths and emits one
/// [`FeedbackRecord`] per unique document id, in traversal order.
/// Dedup is first-seen-wins and scoped to this single query's
/// results; the positive/negative pair is never cross-deduplicated.
/// The extractor runs over each document's own snippets and title,
/// not its parent's.
pub fn normalize_feedback(
    raw_matches: &[RawMatch],
    sentiment: Sentiment,
    datasource: &str,
) -> Vec<FeedbackRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for location in walk_matches(raw_matches) {
        let raw = location.raw();
        if !raw.is_datasource(datasource) {
            continue;
        }
        let Some(document) = raw.document.as_ref() else {
            continue;
        };
        let Some(id) = document.id.as_deref() else {
            continue;
        };
        if !seen.insert(id.to_string()) {
            continue;
        }

        let title = raw.title.clone().unwrap_or_default();
        let fields = extract_fields(&raw.snippet_texts(), &title);
        let (date, create_time) = format_create_time(id, document.create_time.as_deref());

        records.push(FeedbackRecord {
            id: id.to_string(),
            ticket_key: document.doc_key.clone().unwrap_or_else(|| id.to_string()),
            summary: title,
            url: raw.url.clone().unwrap_or_default(),
            date,
            create_time,
            sentiment,
            fields,
        });
    }

    records
}

/// Human date plus the raw timestamp. An unparseable timestamp is a
/// warning, never an error: the record keeps the raw value and shows
/// the `"-"` sentinel.
fn format_create_time(id: &str, create_time: Option<&str>) -> (String, Option<String>) {
    let Some(raw) = create_time else {
        return (MISSING_DATE.to_string(), None);
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => (
            parsed.format("%b %-d, %Y").to_string(),
            Some(raw.to_string()),
        ),
        Err(err) => {
            warn!(document_id = id, create_time = raw, error = %err, "unparseable create time");
            (MISSING_DATE.to_string(), Some(raw.to_string()))
        }
    }
}
