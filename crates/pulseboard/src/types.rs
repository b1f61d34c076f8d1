use std::fmt;

use gleanapi::RawMatch;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// The sentiment bucket a query represents. Tags every record the
/// query produced; never inferred from record content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// Best-effort regex extraction over snippet text. A `None` means the
/// field was not extracted at all; `Some("")` means its label was
/// present with an empty value. Downstream code relies on the
/// distinction.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub deployment: Option<String>,
    pub user: Option<String>,
    pub stt: Option<String>,
    pub category: Option<String>,
    pub issue_type: Option<String>,
    pub comments: Option<String>,
    pub agent_id: Option<String>,
}

/// The normalized entity the rest of the system consumes. Created
/// once per unique document id per sentiment-tagged query, never
/// mutated afterwards.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub ticket_key: String,
    pub summary: String,
    pub url: String,
    /// Human-formatted date, or `"-"` when missing/unparseable.
    pub date: String,
    pub create_time: Option<String>,
    pub sentiment: Sentiment,
    #[serde(flatten)]
    pub fields: ExtractedFields,
}

/// Occurrence-based counts mirroring the vendor UI's own result
/// count. Deliberately not deduplicated; may exceed the number of
/// normalized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub cluster_heads: usize,
    pub total_issues: usize,
    pub pages: usize,
}

/// Everything the pager accumulated for one query.
#[derive(Debug, Clone, Default)]
pub struct PagedResults {
    pub raw_matches: Vec<RawMatch>,
    pub pages: usize,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentMetrics {
    pub total: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub positive_rate: f64,
    pub negative_rate: f64,
    pub unique_raters: usize,
    pub repeat_raters: usize,
    pub top_issue_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub positive: usize,
    pub negative: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTypeCount {
    pub issue_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCount {
    pub user: String,
    pub total: usize,
    pub negative: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLeaderboards {
    pub top_raters: Vec<UserCount>,
    pub at_risk: Vec<UserCount>,
}
