use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::types::{
    FeedbackRecord, IssueTypeCount, Sentiment, SentimentMetrics, TrendPoint, UserCount,
    UserLeaderboards,
};

const UNKNOWN_ISSUE_TYPE: &str = "Unknown";

/// Records an at-risk user must have before they show up on that
/// leaderboard.
const AT_RISK_MIN_RECORDS: usize = 3;

// Every function here is a pure fold over the record list: no
// incremental state, re-derivable at any time.

fn record_day(record: &FeedbackRecord) -> Option<NaiveDate> {
    let raw = record.create_time.as_deref()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.date_naive())
}

pub fn compute_metrics(records: &[FeedbackRecord]) -> SentimentMetrics {
    let total = records.len();
    let positive_count = records
        .iter()
        .filter(|r| r.sentiment == Sentiment::Positive)
        .count();
    let negative_count = records
        .iter()
        .filter(|r| r.sentiment == Sentiment::Negative)
        .count();

    let (positive_rate, negative_rate) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            positive_count as f64 / total as f64 * 100.0,
            negative_count as f64 / total as f64 * 100.0,
        )
    };

    let mut per_user: HashMap<&str, usize> = HashMap::new();
    for record in records {
        if let Some(user) = record.fields.user.as_deref() {
            *per_user.entry(user).or_default() += 1;
        }
    }
    let unique_raters = per_user.len();
    let repeat_raters = per_user.values().filter(|&&count| count >= 2).count();

    let top_issue_type = compute_issue_type_breakdown(records)
        .into_iter()
        .next()
        .map(|entry| entry.issue_type);

    SentimentMetrics {
        total,
        positive_count,
        negative_count,
        positive_rate,
        negative_rate,
        unique_raters,
        repeat_raters,
        top_issue_type,
    }
}

/// One point per calendar day in `[today - window_days + 1, today]`,
/// zero-filled. Records without a parseable `create_time` are
/// excluded. Dedup by (id, sentiment) guards against duplicate ids
/// slipping through the normalizer while keeping the legitimate
/// positive/negative pair of the same ticket countable on both sides.
pub fn compute_trend(
    records: &[FeedbackRecord],
    window_days: u32,
    today: NaiveDate,
) -> Vec<TrendPoint> {
    let start = today - Duration::days(i64::from(window_days) - 1);
    let mut points: Vec<TrendPoint> = (0..window_days)
        .map(|offset| TrendPoint {
            date: (start + Duration::days(i64::from(offset)))
                .format("%Y-%m-%d")
                .to_string(),
            positive: 0,
            negative: 0,
            total: 0,
        })
        .collect();

    let mut seen: HashSet<(&str, Sentiment)> = HashSet::new();
    for record in records {
        if !seen.insert((record.id.as_str(), record.sentiment)) {
            continue;
        }
        let Some(day) = record_day(record) else {
            continue;
        };
        if day < start || day > today {
            continue;
        }
        let point = &mut points[(day - start).num_days() as usize];
        match record.sentiment {
            Sentiment::Positive => point.positive += 1,
            Sentiment::Negative => point.negative += 1,
        }
        point.total += 1;
    }

    points
}

pub fn compute_trend_now(records: &[FeedbackRecord], window_days: u32) -> Vec<TrendPoint> {
    compute_trend(records, window_days, Utc::now().date_naive())
}

/// Counts grouped by issue type, `"Unknown"` when absent, descending
/// by count with name as the tiebreak so output order is stable.
pub fn compute_issue_type_breakdown(records: &[FeedbackRecord]) -> Vec<IssueTypeCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let issue_type = record
            .fields
            .issue_type
            .as_deref()
            .unwrap_or(UNKNOWN_ISSUE_TYPE);
        *counts.entry(issue_type).or_default() += 1;
    }

    let mut breakdown: Vec<IssueTypeCount> = counts
        .into_iter()
        .map(|(issue_type, count)| IssueTypeCount {
            issue_type: issue_type.to_string(),
            count,
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.issue_type.cmp(&b.issue_type))
    });
    breakdown
}

/// Top raters by total count, and at-risk users (≥ 3 records) by
/// negative count. Records without an extracted user email carry no
/// attribution and are skipped.
pub fn compute_user_leaderboards(records: &[FeedbackRecord], top_n: usize) -> UserLeaderboards {
    let mut per_user: HashMap<&str, (usize, usize)> = HashMap::new();
    for record in records {
        let Some(user) = record.fields.user.as_deref() else {
            continue;
        };
        let entry = per_user.entry(user).or_default();
        entry.0 += 1;
        if record.sentiment == Sentiment::Negative {
            entry.1 += 1;
        }
    }

    let mut counts: Vec<UserCount> = per_user
        .into_iter()
        .map(|(user, (total, negative))| UserCount {
            user: user.to_string(),
            total,
            negative,
        })
        .collect();

    let mut top_raters = counts.clone();
    top_raters.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.user.cmp(&b.user)));
    top_raters.truncate(top_n);

    counts.retain(|entry| entry.total >= AT_RISK_MIN_RECORDS);
    counts.sort_by(|a, b| {
        b.negative
            .cmp(&a.negative)
            .then_with(|| b.total.cmp(&a.total))
            .then_with(|| a.user.cmp(&b.user))
    });
    counts.truncate(top_n);

    UserLeaderboards {
        top_raters,
        at_risk: counts,
    }
}

/// Rolling time-window filter for the windowed views. Records without
/// a parseable `create_time` are excluded here; window-independent
/// totals keep them.
pub fn filter_window(
    records: &[FeedbackRecord],
    window_days: u32,
    today: NaiveDate,
) -> Vec<FeedbackRecord> {
    let start = today - Duration::days(i64::from(window_days) - 1);
    records
        .iter()
        .filter(|record| match record_day(record) {
            Some(day) => day >= start && day <= today,
            None => false,
        })
        .cloned()
        .collect()
}

pub fn filter_window_now(records: &[FeedbackRecord], window_days: u32) -> Vec<FeedbackRecord> {
    filter_window(records, window_days, Utc::now().date_naive())
}
