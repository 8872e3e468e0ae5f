// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;
use std::time::Duration;

use crate::catalog::{ApiEndpoints, PodcastId, lookup_recent_episodes};
use crate::error::ScrapeError;
use crate::http::HttpClient;
use crate::known::KnownUrls;
use crate::output::{WriteMode, dedup_preserving_order, write_url_list};
use crate::progress::SharedProgressReporter;
use crate::search::{SearchOptions, SearchOutcome, SearchTerms, search_older_episodes};
use crate::validate::{DEFAULT_PROBE_DELAY, ValidationReport, validate_urls};

/// Options for a scrape run
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Run the episode-number search after the lookup
    pub search_older: bool,
    pub search: SearchOptions,
    /// Show name used in search queries; looked up when absent
    pub search_term: Option<String>,
    /// Probe a sample of the collected URLs before writing
    pub validate: bool,
    pub validation_sample: usize,
    pub validation_delay: Duration,
    pub mode: WriteMode,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            search_older: true,
            search: SearchOptions::default(),
            search_term: None,
            validate: true,
            validation_sample: 10,
            validation_delay: DEFAULT_PROBE_DELAY,
            mode: WriteMode::Overwrite,
        }
    }
}

/// Result of a scrape run
#[derive(Debug, Clone)]
pub struct ScrapeResult {
    pub podcast_id: PodcastId,
    /// URLs returned by the lookup call
    pub recent_count: usize,
    /// Outcome of the episode-number search, if it ran
    pub search: Option<SearchOutcome>,
    /// Deduplicated URLs in first-seen order, as written
    pub urls: Vec<String>,
    pub validation: Option<ValidationReport>,
}

/// Collect the episode URLs of a podcast and write them to `output`
///
/// 1. Extracts the podcast id from `podcast_url`
/// 2. Looks up the most recent episodes
/// 3. Searches for older episodes by number, if enabled and the lookup found anything
/// 4. Deduplicates, optionally validates a sample, and writes the list
pub async fn scrape_podcast<C: HttpClient>(
    client: &C,
    endpoints: &ApiEndpoints,
    podcast_url: &str,
    output: &Path,
    options: &ScrapeOptions,
    reporter: &SharedProgressReporter,
) -> Result<ScrapeResult, ScrapeError> {
    let podcast_id = PodcastId::from_url(podcast_url)?;

    let recent = lookup_recent_episodes(client, endpoints, podcast_id, reporter).await;
    let recent_count = recent.urls.len();

    let search = if options.search_older && !recent.urls.is_empty() {
        match resolve_search_terms(podcast_id, options, recent.show_name.as_deref()) {
            Some(terms) => {
                let known: KnownUrls = recent.urls.iter().cloned().collect();
                Some(
                    search_older_episodes(
                        client,
                        endpoints,
                        podcast_id,
                        &terms,
                        &known,
                        &options.search,
                        reporter,
                    )
                    .await,
                )
            }
            None => None,
        }
    } else {
        None
    };

    let found = search.iter().flat_map(|outcome| outcome.found.iter().cloned());
    let urls = dedup_preserving_order(recent.urls.into_iter().chain(found));

    if urls.is_empty() {
        return Err(ScrapeError::NothingFound);
    }

    let validation = if options.validate {
        Some(
            validate_urls(
                client,
                &urls,
                options.validation_sample,
                options.validation_delay,
                reporter,
            )
            .await,
        )
    } else {
        None
    };

    write_url_list(output, &urls, podcast_url, options.mode)?;

    Ok(ScrapeResult {
        podcast_id,
        recent_count,
        search,
        urls,
        validation,
    })
}

/// Pick the show name for search queries: explicit option first, else the catalog name
fn resolve_search_terms(
    podcast_id: PodcastId,
    options: &ScrapeOptions,
    show_name: Option<&str>,
) -> Option<SearchTerms> {
    match options.search_term.as_deref().or(show_name) {
        Some(term) => Some(SearchTerms::new(term)),
        None => {
            tracing::warn!(%podcast_id, "podcast has no name, skipping episode search");
            None
        }
    }
}
