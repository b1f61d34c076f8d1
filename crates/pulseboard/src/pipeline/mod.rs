//! The result-extraction and aggregation pipeline. The pager drives
//! the search client to exhaustion; the stats calculator and the
//! feedback normalizer (built on the field extractor) read the
//! accumulated matches; the aggregator folds normalized records into
//! the dashboard views. Two independent sentiment-tagged queries run
//! through it per dashboard load and their normalized outputs are
//! concatenated before aggregation.

pub mod aggregate;
pub mod client;
pub mod extract;
pub mod normalize;
pub mod pager;
pub mod stats;
