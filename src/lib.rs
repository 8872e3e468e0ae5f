// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod catalog;
pub mod error;
pub mod http;
pub mod known;
pub mod media;
pub mod output;
pub mod progress;
pub mod scrape;
pub mod search;
pub mod validate;

// Re-export main types for convenience
pub use catalog::{ApiEndpoints, PodcastId, PodcastInfo, lookup_podcast_info, slugify};
pub use error::{CatalogError, MediaError, OutputError, RangeError, ScrapeError};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use known::KnownUrls;
pub use output::{WriteMode, dedup_preserving_order, read_url_list, write_url_list};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use scrape::{ScrapeOptions, ScrapeResult, scrape_podcast};
pub use search::{EpisodeRange, SearchOptions, SearchOutcome, SearchStop, search_older_episodes};
pub use validate::{ValidationReport, validate_urls};
