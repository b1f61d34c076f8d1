use std::sync::Arc;

use bytes::Bytes;
use common::configuration::GleanConfig;
use common::errors::PipelineError;
use gleanapi::FacetFilter;
use http_body_util::{combinators::BoxBody, BodyExt};
use hyper::{body::Incoming, Request, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::json_response;
use crate::pipeline::aggregate::{
    compute_issue_type_breakdown, compute_metrics, compute_trend_now, compute_user_leaderboards,
    filter_window_now,
};
use crate::pipeline::client::{SearchClient, SearchQuery};
use crate::pipeline::normalize::normalize_feedback;
use crate::pipeline::pager::fetch_all_pages;
use crate::pipeline::stats::compute_search_stats;
use crate::types::{
    FeedbackRecord, IssueTypeCount, SearchStats, Sentiment, SentimentMetrics, TrendPoint,
    UserLeaderboards,
};

const VALID_WINDOWS: &[u32] = &[1, 7, 14, 30];
const LEADERBOARD_SIZE: usize = 5;

fn default_window_days() -> u32 {
    7
}

#[derive(Debug, Deserialize)]
pub struct DashboardRequest {
    pub customer: String,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub records: Vec<FeedbackRecord>,
    pub metrics: SentimentMetrics,
    pub trend: Vec<TrendPoint>,
    pub issue_types: Vec<IssueTypeCount>,
    pub leaderboards: UserLeaderboards,
    pub stats: BucketStats,
}

#[derive(Debug, Serialize)]
pub struct BucketStats {
    pub negative: SearchStats,
    pub positive: SearchStats,
}

pub async fn dashboard(
    request: Request<Incoming>,
    search_client: Arc<SearchClient>,
    glean_config: Arc<GleanConfig>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, hyper::Error> {
    let body_bytes = request.collect().await?.to_bytes();
    let dashboard_request: DashboardRequest = match serde_json::from_slice(&body_bytes) {
        Ok(parsed) => parsed,
        Err(err) => {
            return Ok(ServiceError::InvalidRequest(err.to_string()).into_response());
        }
    };

    match run_dashboard(&search_client, &glean_config, &dashboard_request).await {
        Ok(response) => match json_response(&response) {
            Ok(response) => Ok(response),
            Err(err) => Ok(err.into_response()),
        },
        Err(err) => {
            warn!(customer = %dashboard_request.customer, error = %err, "dashboard load failed");
            Ok(err.into_response())
        }
    }
}

/// One dashboard load: the negative and positive queries run
/// concurrently (no shared state between them; each pages
/// sequentially over its own cursors), their normalized outputs are
/// concatenated, and the aggregate views are derived from scratch.
pub async fn run_dashboard(
    search_client: &SearchClient,
    glean_config: &GleanConfig,
    request: &DashboardRequest,
) -> Result<DashboardResponse, ServiceError> {
    if request.customer.trim().is_empty() {
        return Err(ServiceError::InvalidRequest(
            "customer must not be empty".to_string(),
        ));
    }
    if !VALID_WINDOWS.contains(&request.window_days) {
        return Err(ServiceError::InvalidRequest(
            "window_days must be 1, 7, 14, or 30".to_string(),
        ));
    }

    let load_id = Uuid::new_v4();
    info!(
        load_id = %load_id,
        customer = %request.customer,
        window_days = request.window_days,
        "dashboard load started"
    );

    let negative_query = sentiment_query(glean_config, &request.customer, Sentiment::Negative);
    let positive_query = sentiment_query(glean_config, &request.customer, Sentiment::Positive);

    let (negative, positive) = tokio::join!(
        run_bucket(search_client, &negative_query, Sentiment::Negative),
        run_bucket(search_client, &positive_query, Sentiment::Positive),
    );
    let (mut records, negative_stats) = negative?;
    let (positive_records, positive_stats) = positive?;
    records.extend(positive_records);

    // Display convention: newest first; undated records sink to the
    // bottom.
    records.sort_by(|a, b| b.create_time.cmp(&a.create_time));

    let windowed = filter_window_now(&records, request.window_days);
    let response = DashboardResponse {
        metrics: compute_metrics(&records),
        trend: compute_trend_now(&records, request.window_days),
        issue_types: compute_issue_type_breakdown(&windowed),
        leaderboards: compute_user_leaderboards(&windowed, LEADERBOARD_SIZE),
        stats: BucketStats {
            negative: negative_stats,
            positive: positive_stats,
        },
        records,
    };

    info!(
        load_id = %load_id,
        records = response.records.len(),
        negative_total = response.stats.negative.total_issues,
        positive_total = response.stats.positive.total_issues,
        "dashboard load finished"
    );
    Ok(response)
}

async fn run_bucket(
    search_client: &SearchClient,
    query: &SearchQuery,
    sentiment: Sentiment,
) -> Result<(Vec<FeedbackRecord>, SearchStats), PipelineError> {
    let paged = fetch_all_pages(search_client, query).await?;
    let stats = compute_search_stats(&paged.raw_matches, paged.pages, search_client.datasource());
    let records = normalize_feedback(&paged.raw_matches, sentiment, search_client.datasource());
    Ok((records, stats))
}

fn sentiment_query(config: &GleanConfig, customer: &str, sentiment: Sentiment) -> SearchQuery {
    let label = match sentiment {
        Sentiment::Negative => &config.negative_label,
        Sentiment::Positive => &config.positive_label,
    };
    SearchQuery {
        query: customer.to_string(),
        facet_filters: vec![FacetFilter::equals("label", label)],
    }
}
