use std::time::Duration;

use common::configuration::GleanConfig;
use common::consts::SEARCH_API_PATH;
use common::errors::PipelineError;
use gleanapi::{FacetFilter, RequestOptions, SearchRequest, SearchResponse};
use tracing::debug;

/// The query-dependent half of one search: the free-text query plus
/// the facet filters that select a sentiment bucket. Everything else
/// (datasource, page size, credentials) lives on the client.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub query: String,
    pub facet_filters: Vec<FacetFilter>,
}

/// Issues one page request at a time against the vendor search
/// endpoint. Holds its configuration explicitly; there is no
/// process-wide credential state. No retries: a failed page request
/// aborts the entire pagination.
#[derive(Debug)]
pub struct SearchClient {
    http: reqwest::Client,
    search_url: String,
    token: String,
    page_size: u32,
    datasource: String,
}

impl SearchClient {
    pub fn new(config: &GleanConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| PipelineError::Transport {
                url: config.base_url.clone(),
                message: err.to_string(),
            })?;

        Ok(Self {
            http,
            search_url: format!("{}{}", config.base_url.trim_end_matches('/'), SEARCH_API_PATH),
            token: config.token.clone(),
            page_size: config.page_size,
            datasource: config.datasource.clone(),
        })
    }

    pub fn datasource(&self) -> &str {
        &self.datasource
    }

    pub async fn fetch_page(
        &self,
        query: &SearchQuery,
        cursor: Option<&str>,
    ) -> Result<SearchResponse, PipelineError> {
        let request = SearchRequest {
            query: query.query.clone(),
            page_size: self.page_size,
            cursor: cursor.map(str::to_string),
            request_options: RequestOptions {
                datasources_filter: vec![self.datasource.clone()],
                facet_filters: query.facet_filters.clone(),
            },
        };

        debug!(query = %query.query, cursor = ?cursor, "fetching search page");

        let response = self
            .http
            .post(&self.search_url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|err| PipelineError::Transport {
                url: self.search_url.clone(),
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| PipelineError::Transport {
            url: self.search_url.clone(),
            message: err.to_string(),
        })?;

        if !status.is_success() {
            return Err(PipelineError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let page: SearchResponse = serde_json::from_str(&body)?;
        Ok(page)
    }
}
