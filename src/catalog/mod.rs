// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod api;
mod id;
mod lookup;
mod slug;

pub use api::{
    ApiEndpoints, CatalogResponse, CatalogResult, DEFAULT_API_BASE, EpisodeRecord, PodcastInfo,
};
pub use id::PodcastId;
pub use lookup::{
    LOOKUP_LIMIT, LOOKUP_TIMEOUT, RecentEpisodes, lookup_podcast_info, lookup_recent_episodes,
};
pub use slug::{canonical_episode_url, slugify};

pub(crate) use lookup::fetch_catalog;
