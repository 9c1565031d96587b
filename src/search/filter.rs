use std::sync::Arc;

use tracing::{debug, warn};

use super::error::{SearchError, SearchResult};
use super::provider::SearchProvider;
use super::types::{RawSearchResult, SearchOptions};
use crate::candidate::{Candidate, sort_by_license};
use crate::license::{ImageLicense, check_license, is_logo_or_banner};

/// Drops hits without an image URL, logo/banner URLs and domain-blocked hits;
/// the rest carry their domain verdict.
pub fn filter_candidates(results: Vec<RawSearchResult>) -> Vec<Candidate> {
    results
        .into_iter()
        .filter_map(|r| {
            if r.img_src.trim().is_empty() || is_logo_or_banner(&r.img_src) {
                return None;
            }

            let license = check_license(&r.img_src, &r.url);
            if license == ImageLicense::Blocked {
                debug!(url = %r.img_src, source = %r.url, "Stock domain filtered");
                return None;
            }

            Some(
                Candidate::new(r.img_src, r.url)
                    .with_thumbnail(r.thumbnail_src)
                    .with_title(r.title)
                    .with_license(license),
            )
        })
        .collect()
}

/// Queries every provider in order and concatenates their hits.
///
/// A failing provider is logged and skipped; the call only fails when every
/// provider failed.
pub async fn search_all(
    providers: &[Arc<dyn SearchProvider>],
    query: &str,
    options: &SearchOptions,
) -> SearchResult<Vec<RawSearchResult>> {
    if providers.is_empty() {
        return Err(SearchError::NoProvider);
    }

    let mut merged = Vec::new();
    let mut failures = 0usize;

    for provider in providers {
        match provider.search(query, options).await {
            Ok(results) => merged.extend(results),
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "Search provider failed");
                failures += 1;
            }
        }
    }

    if failures == providers.len() {
        return Err(SearchError::AllProvidersFailed { count: failures });
    }

    Ok(merged)
}

/// Filtered candidates ordered Safe before Unknown, ties in input order.
pub fn rank_candidates(results: Vec<RawSearchResult>) -> Vec<Candidate> {
    let mut candidates = filter_candidates(results);
    sort_by_license(&mut candidates);
    candidates
}
