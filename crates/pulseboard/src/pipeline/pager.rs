use common::consts::MAX_EMPTY_PAGES;
use common::errors::PipelineError;
use tracing::{debug, warn};

use crate::pipeline::client::{SearchClient, SearchQuery};
use crate::types::PagedResults;

/// Drives the search client until the vendor signals exhaustion:
/// no continuation cursor, `hasMoreResults` false (or absent), or
/// [`MAX_EMPTY_PAGES`] consecutive zero-result pages while the vendor
/// still claims more. The last case guarantees termination, not
/// completeness. A failed page request propagates unchanged; there is
/// no partial-result recovery.
pub async fn fetch_all_pages(
    client: &SearchClient,
    query: &SearchQuery,
) -> Result<PagedResults, PipelineError> {
    let mut accumulated = PagedResults::default();
    let mut cursor: Option<String> = None;
    let mut consecutive_empty = 0usize;

    loop {
        let page = client.fetch_page(query, cursor.as_deref()).await?;
        accumulated.pages += 1;

        if page.results.is_empty() {
            consecutive_empty += 1;
        } else {
            consecutive_empty = 0;
        }
        accumulated.raw_matches.extend(page.results);

        let has_more = page.has_more_results.unwrap_or(false);
        if !has_more || page.cursor.is_none() {
            debug!(
                pages = accumulated.pages,
                matches = accumulated.raw_matches.len(),
                "pagination exhausted"
            );
            break;
        }
        if consecutive_empty >= MAX_EMPTY_PAGES {
            warn!(
                pages = accumulated.pages,
                consecutive_empty, "stopping pagination after repeated empty pages"
            );
            break;
        }
        cursor = page.cursor;
    }

    Ok(accumulated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::configuration::GleanConfig;
    use gleanapi::FacetFilter;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    fn client_for(server: &mockito::Server) -> SearchClient {
        SearchClient::new(&GleanConfig {
            base_url: server.url(),
            token: "test-token".to_string(),
            datasource: "jira".to_string(),
            page_size: 100,
            timeout_secs: 5,
            negative_label: "chat-negative".to_string(),
            positive_label: "chat-positive".to_string(),
        })
        .unwrap()
    }

    fn query() -> SearchQuery {
        SearchQuery {
            query: "acme".to_string(),
            facet_filters: vec![FacetFilter::equals("label", "chat-negative")],
        }
    }

    #[tokio::test]
    async fn stops_when_vendor_reports_no_more_results() {
        let mut server = mockito::Server::new_async().await;

        // First request carries no cursor; mocks are matched newest
        // first, so the cursor-specific page is registered second.
        let first = server
            .mock("POST", "/rest/api/v1/search")
            .with_status(200)
            .with_body(
                r#"{"results": [{"document": {"id": "D1", "datasource": "jira"}}],
                    "cursor": "c1", "hasMoreResults": true}"#,
            )
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/rest/api/v1/search")
            .match_body(Matcher::Regex(r#""cursor":"c1""#.to_string()))
            .with_status(200)
            .with_body(
                r#"{"results": [{"document": {"id": "D2", "datasource": "jira"}}],
                    "hasMoreResults": false}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let paged = fetch_all_pages(&client, &query()).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(paged.pages, 2);
        let ids: Vec<&str> = paged
            .raw_matches
            .iter()
            .filter_map(|raw| raw.document_id())
            .collect();
        assert_eq!(ids, vec!["D1", "D2"]);
    }

    #[tokio::test]
    async fn stops_when_cursor_is_absent_despite_more_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/v1/search")
            .with_status(200)
            .with_body(r#"{"results": [], "hasMoreResults": true}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let paged = fetch_all_pages(&client, &query()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(paged.pages, 1);
        assert!(paged.raw_matches.is_empty());
    }

    #[tokio::test]
    async fn safety_stop_after_consecutive_empty_pages() {
        let mut server = mockito::Server::new_async().await;
        // The vendor keeps claiming more results while returning
        // nothing; the pager must give up after MAX_EMPTY_PAGES calls.
        let mock = server
            .mock("POST", "/rest/api/v1/search")
            .with_status(200)
            .with_body(r#"{"results": [], "cursor": "again", "hasMoreResults": true}"#)
            .expect(MAX_EMPTY_PAGES)
            .create_async()
            .await;

        let client = client_for(&server);
        let paged = fetch_all_pages(&client, &query()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(paged.pages, MAX_EMPTY_PAGES);
        assert!(paged.raw_matches.is_empty());
    }

    #[tokio::test]
    async fn page_failure_propagates_without_partial_results() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/api/v1/search")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = fetch_all_pages(&client, &query()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Upstream { status: 500, .. }));
    }
}
