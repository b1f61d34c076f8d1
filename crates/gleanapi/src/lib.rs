//! gleanapi: wire models for the vendor enterprise-search and
//! agent-run APIs, plus the three-depth match-location walker the
//! pipeline is written over. No I/O lives here.

pub mod agent;
pub mod search;

pub use agent::{AgentContent, AgentMessage, AgentRunInput, AgentRunRequest, AgentRunResponse};
pub use search::{
    walk_matches, DocumentSpec, FacetFilter, FacetFilterValue, MatchLocation, RawMatch,
    RelationType, RequestOptions, ResultGroup, SearchRequest, SearchResponse, Snippet,
};
