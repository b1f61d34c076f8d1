use gleanapi::{walk_matches, RawMatch};

use crate::types::SearchStats;

/// Occurrence-based counting over all three nesting depths, matching
/// the vendor UI's own result count for the same query. No dedup by
/// document id happens here: a document surfaced both top-level and
/// nested is counted at every position. The deduplicated record list
/// from the normalizer is allowed to be smaller.
pub fn compute_search_stats(
    raw_matches: &[RawMatch],
    pages: usize,
    datasource: &str,
) -> SearchStats {
    let mut cluster_heads = 0;
    let mut nested = 0;

    for location in walk_matches(raw_matches) {
        if !location.raw().is_datasource(datasource) {
            continue;
        }
        if location.is_top_level() {
            cluster_heads += 1;
        } else {
            nested += 1;
        }
    }

    SearchStats {
        cluster_heads,
        total_issues: cluster_heads + nested,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize::normalize_feedback;
    use crate::types::Sentiment;
    use gleanapi::{DocumentSpec, ResultGroup};
    use pretty_assertions::assert_eq;

    fn jira_match(id: &str) -> RawMatch {
        RawMatch {
            document: Some(DocumentSpec {
                id: Some(id.to_string()),
                datasource: Some("jira".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn counts_occurrences_at_every_depth() {
        // The same document appears top-level and nested one level
        // down; both occurrences count.
        let mut top = jira_match("D1");
        top.clustered_results = vec![jira_match("D1")];

        let stats = compute_search_stats(&[top], 1, "jira");
        assert_eq!(
            stats,
            SearchStats {
                cluster_heads: 1,
                total_issues: 2,
                pages: 1
            }
        );
    }

    #[test]
    fn ignores_other_datasources() {
        let mut top = jira_match("D1");
        top.clustered_results = vec![RawMatch {
            document: Some(DocumentSpec {
                id: Some("C1".to_string()),
                datasource: Some("confluence".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }];
        top.result_groups = vec![ResultGroup {
            group_name: Some("related".to_string()),
            results: vec![jira_match("D2")],
        }];

        let stats = compute_search_stats(&[top], 3, "jira");
        assert_eq!(stats.cluster_heads, 1);
        assert_eq!(stats.total_issues, 2);
        assert_eq!(stats.pages, 3);
    }

    #[test]
    fn total_issues_diverges_from_deduplicated_records() {
        // The occurrence-based count and the deduplicated record
        // count follow different policies on purpose: the former
        // mirrors the vendor UI, the latter is for clean display.
        let mut top = jira_match("D1");
        top.clustered_results = vec![jira_match("D1")];
        let matches = vec![top];

        let stats = compute_search_stats(&matches, 1, "jira");
        let records = normalize_feedback(&matches, Sentiment::Negative, "jira");

        assert_eq!(stats.total_issues, 2);
        assert_eq!(records.len(), 1);
    }
}
