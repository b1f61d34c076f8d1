pub const SEARCH_API_PATH: &str = "/rest/api/v1/search";
pub const AGENT_RUN_API_PATH: &str = "/rest/api/v1/agents/run";

pub const DASHBOARD_PATH: &str = "/v1/dashboard";
pub const AGENT_SUMMARY_PATH: &str = "/v1/agent/summary";
pub const HEALTH_PATH: &str = "/healthz";

pub const DEFAULT_DATASOURCE: &str = "jira";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Consecutive zero-result pages tolerated while the vendor still
/// reports more results. A termination bound, not a completeness
/// promise.
pub const MAX_EMPTY_PAGES: usize = 3;

/// Sentinel shown when a record's creation timestamp is missing or
/// unparseable.
pub const MISSING_DATE: &str = "-";
