//! Image search front end: providers, hit filtering and query building.

pub mod error;
pub mod filter;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod provider;
pub mod query;
pub mod types;


pub use error::{SearchError, SearchResult};
pub use filter::{filter_candidates, rank_candidates, search_all};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSearchProvider;
pub use provider::{SearchProvider, SearxngProvider};
pub use query::build_image_query;
pub use types::{RawSearchResult, SearchOptions};
