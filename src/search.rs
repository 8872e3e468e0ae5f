// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::catalog::{ApiEndpoints, EpisodeRecord, PodcastId, fetch_catalog};
use crate::error::{CatalogError, RangeError};
use crate::http::HttpClient;
use crate::known::KnownUrls;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Results requested per search call
pub const SEARCH_PAGE_SIZE: u32 = 50;

/// Timeout for search calls
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Inclusive range of episode numbers to probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeRange {
    pub start: u32,
    pub end: u32,
}

impl EpisodeRange {
    pub fn new(start: u32, end: u32) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }
}

impl FromStr for EpisodeRange {
    type Err = RangeError;

    /// Parse `"start-end"`, e.g. `"1-200"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RangeError::InvalidFormat(s.to_string());

        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = start.trim().parse().map_err(|_| invalid())?;
        let end = end.trim().parse().map_err(|_| invalid())?;

        Self::new(start, end)
    }
}

impl fmt::Display for EpisodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Query phrasings tried for each episode number, most general first
#[derive(Debug, Clone)]
pub struct SearchTerms {
    show: String,
}

impl SearchTerms {
    pub fn new(show: impl Into<String>) -> Self {
        Self { show: show.into() }
    }

    /// Query variants for one episode number
    pub fn variants(&self, index: u32) -> Vec<String> {
        let show = self.show.trim().to_lowercase();
        vec![format!("{show} {index}"), format!("{show} episode {index}")]
    }
}

/// Options for the episode-number search
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub range: EpisodeRange,
    /// Hard cap on search calls across the whole run
    pub max_requests: usize,
    /// Pause after every search call
    pub request_delay: Duration,
    /// Extra pause after every `batch_size` episode numbers
    pub batch_pause: Duration,
    pub batch_size: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            range: EpisodeRange { start: 1, end: 200 },
            max_requests: 100,
            request_delay: Duration::from_millis(500),
            batch_pause: Duration::from_secs(2),
            batch_size: 10,
        }
    }
}

/// Request accounting for one search run
#[derive(Debug, Clone)]
pub struct SearchBudget {
    used: usize,
    cap: usize,
}

impl SearchBudget {
    pub fn new(cap: usize) -> Self {
        Self { used: 0, cap }
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.cap
    }

    /// Count one request; callers check `is_exhausted` first
    fn spend(&mut self) {
        debug_assert!(!self.is_exhausted());
        self.used += 1;
    }

    pub fn used(&self) -> usize {
        self.used
    }
}

/// Why a search run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStop {
    /// Every episode number in the range was tried
    Completed,
    /// The request cap was reached while working on `index`
    BudgetExhausted { index: u32 },
    /// The service answered 403 while working on `index`
    RateLimited { index: u32 },
}

impl fmt::Display for SearchStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::BudgetExhausted { index } => {
                write!(f, "request limit reached at episode {index}")
            }
            Self::RateLimited { index } => write!(f, "rate limited at episode {index}"),
        }
    }
}

/// Result of a search run; `found` never overlaps the known URLs passed in
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub found: Vec<String>,
    pub requests_made: usize,
    pub stop: SearchStop,
}

/// Outcome of a single search call
enum Query {
    /// Episodes of the target show, in result order
    Episodes(Vec<EpisodeRecord>),
    RateLimited,
    Failed(CatalogError),
}

/// Search for episodes the lookup endpoint no longer returns
///
/// For every episode number in the range the query variants are tried in
/// order until one yields an episode of this show that is neither in
/// `known` nor already found in this run. The request cap is checked before
/// every call and a 403 ends the whole run at once; both return what was
/// found so far. Other failures only skip the current variant.
pub async fn search_older_episodes<C: HttpClient>(
    client: &C,
    endpoints: &ApiEndpoints,
    podcast_id: PodcastId,
    terms: &SearchTerms,
    known: &KnownUrls,
    options: &SearchOptions,
    reporter: &SharedProgressReporter,
) -> SearchOutcome {
    let range = options.range;
    reporter.report(ProgressEvent::SearchStarted {
        start: range.start,
        end: range.end,
    });

    let mut budget = SearchBudget::new(options.max_requests);
    let mut found = KnownUrls::new();

    let stop = 'episodes: {
        for index in range.start..=range.end {
            for term in terms.variants(index) {
                if budget.is_exhausted() {
                    tracing::info!(index, cap = budget.cap, "search request limit reached");
                    break 'episodes SearchStop::BudgetExhausted { index };
                }
                budget.spend();

                let satisfied = match run_query(client, endpoints, podcast_id, &term).await {
                    Query::RateLimited => {
                        tracing::warn!(index, term = %term, "search rate limited, stopping");
                        break 'episodes SearchStop::RateLimited { index };
                    }
                    Query::Failed(e) => {
                        tracing::debug!(index, term = %term, error = %e, "search query failed");
                        false
                    }
                    Query::Episodes(records) => {
                        match first_new_episode(records, known, &found) {
                            Some(record) => {
                                tracing::debug!(index, url = %record.url, "found episode");
                                reporter.report(ProgressEvent::SearchHit {
                                    index,
                                    title: record.title,
                                });
                                found.insert(record.url);
                                true
                            }
                            None => false,
                        }
                    }
                };

                tokio::time::sleep(options.request_delay).await;

                if satisfied {
                    break;
                }
            }

            if options.batch_size > 0 && index % options.batch_size == 0 {
                tokio::time::sleep(options.batch_pause).await;
            }
        }

        SearchStop::Completed
    };

    let outcome = SearchOutcome {
        found: found.into_vec(),
        requests_made: budget.used(),
        stop,
    };

    reporter.report(ProgressEvent::SearchFinished {
        found: outcome.found.len(),
        requests_made: outcome.requests_made,
        stop,
    });

    outcome
}

async fn run_query<C: HttpClient>(
    client: &C,
    endpoints: &ApiEndpoints,
    podcast_id: PodcastId,
    term: &str,
) -> Query {
    let url = match endpoints.search_url(term, SEARCH_PAGE_SIZE) {
        Ok(url) => url,
        Err(e) => return Query::Failed(e),
    };

    match fetch_catalog(client, &url, SEARCH_TIMEOUT).await {
        Ok(response) => Query::Episodes(
            response
                .results
                .iter()
                .filter(|result| result.is_episode_of(podcast_id))
                .filter_map(|result| EpisodeRecord::from_result(podcast_id, result))
                .collect(),
        ),
        Err(CatalogError::HttpStatus { status: 403, .. }) => Query::RateLimited,
        Err(e) => Query::Failed(e),
    }
}

/// First record whose URL has not been seen in either discovery phase
fn first_new_episode(
    records: Vec<EpisodeRecord>,
    known: &KnownUrls,
    found: &KnownUrls,
) -> Option<EpisodeRecord> {
    records
        .into_iter()
        .find(|record| !known.contains(&record.url) && !found.contains(&record.url))
}
