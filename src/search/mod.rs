//! Search client: request building, response normalization and pagination.

pub mod client;
pub mod cursor;
pub mod model;
pub mod pager;
pub mod request;

#[cfg(test)]
mod tests;

pub use client::CaseLawClient;
pub use cursor::{Cursor, extract_cursor};
pub use model::{Opinion, Pagination, SearchPage, SearchResult};
pub use pager::{AggregatedResults, ResultPager};
pub use request::{
    QueryParams, SearchMode, SearchRequest, StatusFilter, clamp_page_size, fold_citation_bounds,
    parse_filed_date,
};
