use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

// Relation applied to a single facet value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Equals,
    NotEquals,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub page_size: u32,
    pub cursor: Option<String>,
    pub request_options: RequestOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasources_filter: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facet_filters: Vec<FacetFilter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetFilter {
    pub field_name: String,
    pub values: Vec<FacetFilterValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetFilterValue {
    pub value: String,
    pub relation_type: RelationType,
}

impl FacetFilter {
    pub fn equals(field_name: &str, value: &str) -> Self {
        Self {
            field_name: field_name.to_string(),
            values: vec![FacetFilterValue {
                value: value.to_string(),
                relation_type: RelationType::Equals,
            }],
        }
    }
}

/// One page of vendor search results.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<RawMatch>,
    pub cursor: Option<String>,
    pub has_more_results: Option<bool>,
}

/// A vendor search hit. The same logical document can be surfaced as
/// a top-level hit, inside another hit's `clusteredResults`, or
/// inside a named group of clusters; every field is optional because
/// the payload is untrusted.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    pub document: Option<DocumentSpec>,
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snippets: Vec<Snippet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clustered_results: Vec<RawMatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub result_groups: Vec<ResultGroup>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSpec {
    pub id: Option<String>,
    pub datasource: Option<String>,
    pub doc_key: Option<String>,
    pub create_time: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultGroup {
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<RawMatch>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub text: Option<String>,
}

impl RawMatch {
    pub fn document_id(&self) -> Option<&str> {
        self.document.as_ref()?.id.as_deref()
    }

    pub fn is_datasource(&self, datasource: &str) -> bool {
        self.document
            .as_ref()
            .and_then(|doc| doc.datasource.as_deref())
            .is_some_and(|ds| ds == datasource)
    }

    pub fn snippet_texts(&self) -> Vec<&str> {
        self.snippets
            .iter()
            .filter_map(|snippet| snippet.text.as_deref())
            .collect()
    }
}

/// Where in the vendor's nesting a match was found. The three cases
/// replace recursive object inspection: depth 0 is a top-level hit,
/// depth 1 a clustered result under a hit, depth 2 a result inside a
/// named group of clusters.
#[derive(Debug, Clone, Copy)]
pub enum MatchLocation<'a> {
    TopLevel(&'a RawMatch),
    Clustered(&'a RawMatch),
    Grouped(&'a RawMatch),
}

impl<'a> MatchLocation<'a> {
    pub fn raw(&self) -> &'a RawMatch {
        match self {
            MatchLocation::TopLevel(raw)
            | MatchLocation::Clustered(raw)
            | MatchLocation::Grouped(raw) => raw,
        }
    }

    pub fn is_top_level(&self) -> bool {
        matches!(self, MatchLocation::TopLevel(_))
    }
}

/// Yields every match at all three depths: each top-level hit first,
/// then its clustered results, then its grouped results, in input
/// order. Nesting below depth 2 is not a vendor shape and is not
/// visited.
pub fn walk_matches(matches: &[RawMatch]) -> impl Iterator<Item = MatchLocation<'_>> {
    matches.iter().flat_map(|raw| {
        std::iter::once(MatchLocation::TopLevel(raw))
            .chain(raw.clustered_results.iter().map(MatchLocation::Clustered))
            .chain(
                raw.result_groups
                    .iter()
                    .flat_map(|group| group.results.iter().map(MatchLocation::Grouped)),
            )
    })
}
