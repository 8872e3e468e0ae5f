// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Deserialize;
use url::Url;

use crate::error::CatalogError;

use super::{PodcastId, canonical_episode_url};

/// Default catalog API host
pub const DEFAULT_API_BASE: &str = "https://itunes.apple.com";

/// Kind reported for episode results
const EPISODE_KIND: &str = "podcast-episode";

/// Kind reported for the show record itself
const PODCAST_KIND: &str = "podcast";

/// Location of the lookup and search endpoints
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    base: String,
}

impl ApiEndpoints {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Lookup URL returning a show and up to `limit` of its recent episodes
    pub fn episodes_url(&self, podcast_id: PodcastId, limit: u32) -> Result<Url, CatalogError> {
        Ok(Url::parse_with_params(
            &self.endpoint("lookup"),
            &[
                ("id", podcast_id.to_string()),
                ("media", "podcast".to_string()),
                ("entity", "podcastEpisode".to_string()),
                ("limit", limit.to_string()),
            ],
        )?)
    }

    /// Lookup URL returning only the show record
    pub fn podcast_url(&self, podcast_id: PodcastId) -> Result<Url, CatalogError> {
        Ok(Url::parse_with_params(
            &self.endpoint("lookup"),
            &[("id", podcast_id.to_string())],
        )?)
    }

    /// Free-text episode search URL
    pub fn search_url(&self, term: &str, limit: u32) -> Result<Url, CatalogError> {
        Ok(Url::parse_with_params(
            &self.endpoint("search"),
            &[
                ("term", term.to_string()),
                ("media", "podcast".to_string()),
                ("entity", "podcastEpisode".to_string()),
                ("limit", limit.to_string()),
            ],
        )?)
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base.trim_end_matches('/'), name)
    }
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

/// Body shared by the lookup and search endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub results: Vec<CatalogResult>,
}

/// One entry of a catalog response; shows and episodes share the shape
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResult {
    pub kind: Option<String>,
    pub collection_id: Option<u64>,
    pub track_id: Option<u64>,
    pub track_name: Option<String>,
    pub collection_name: Option<String>,
    pub artist_name: Option<String>,
    pub primary_genre_name: Option<String>,
    pub track_count: Option<u32>,
    pub country: Option<String>,
    pub feed_url: Option<String>,
    pub collection_view_url: Option<String>,
}

impl CatalogResult {
    /// Whether this entry describes the show rather than an episode
    pub fn is_podcast(&self) -> bool {
        self.kind.as_deref() == Some(PODCAST_KIND)
    }

    /// Whether this entry is an episode of the given show
    pub fn is_episode_of(&self, podcast_id: PodcastId) -> bool {
        self.kind.as_deref() == Some(EPISODE_KIND) && self.collection_id == Some(podcast_id.get())
    }
}

/// An episode as seen in a single API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRecord {
    pub id: u64,
    pub title: String,
    pub url: String,
}

impl EpisodeRecord {
    /// Build a record from a catalog entry; entries without a track id yield `None`
    pub fn from_result(podcast_id: PodcastId, result: &CatalogResult) -> Option<Self> {
        let id = result.track_id?;
        let title = result.track_name.clone().unwrap_or_default();
        let url = canonical_episode_url(&title, podcast_id, id);

        Some(Self { id, title, url })
    }
}

/// Show metadata as returned by a plain lookup
#[derive(Debug, Clone)]
pub struct PodcastInfo {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub episode_count: Option<u32>,
    pub country: Option<String>,
    pub feed_url: Option<String>,
    pub store_url: Option<String>,
}

impl From<CatalogResult> for PodcastInfo {
    fn from(result: CatalogResult) -> Self {
        Self {
            name: result.collection_name,
            artist: result.artist_name,
            genre: result.primary_genre_name,
            episode_count: result.track_count,
            country: result.country,
            feed_url: result.feed_url,
            store_url: result.collection_view_url,
        }
    }
}
