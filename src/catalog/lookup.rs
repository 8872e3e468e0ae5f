// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use url::Url;

use crate::error::CatalogError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

use super::{ApiEndpoints, CatalogResponse, EpisodeRecord, PodcastId, PodcastInfo};

/// Maximum number of episodes the lookup endpoint hands out
pub const LOOKUP_LIMIT: u32 = 200;

/// Timeout for lookup calls
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch and decode a catalog response, treating any non-2xx status as an error
pub(crate) async fn fetch_catalog<C: HttpClient>(
    client: &C,
    url: &Url,
    timeout: Duration,
) -> Result<CatalogResponse, CatalogError> {
    let response = client
        .get(url, timeout)
        .await
        .map_err(|e| CatalogError::RequestFailed {
            url: url.to_string(),
            source: e,
        })?;

    if !response.is_success() {
        return Err(CatalogError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(serde_json::from_slice(&response.body)?)
}

/// Outcome of the recent-episodes lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentEpisodes {
    /// Show name from the podcast record, if the response carried one
    pub show_name: Option<String>,
    /// Canonical episode URLs in service order
    pub urls: Vec<String>,
}

/// Fetch the most recent episodes of a podcast and return their canonical URLs
///
/// Order is whatever the service returns (most recent first in practice).
/// Entries without a track id are skipped. Failures are logged and reported,
/// and yield an empty result so later discovery phases still run.
pub async fn lookup_recent_episodes<C: HttpClient>(
    client: &C,
    endpoints: &ApiEndpoints,
    podcast_id: PodcastId,
    reporter: &SharedProgressReporter,
) -> RecentEpisodes {
    reporter.report(ProgressEvent::LookupStarted {
        podcast_id: podcast_id.to_string(),
    });

    match fetch_recent_episodes(client, endpoints, podcast_id).await {
        Ok((show_name, records)) => {
            reporter.report(ProgressEvent::LookupCompleted {
                episodes: records.len(),
            });
            RecentEpisodes {
                show_name,
                urls: records.into_iter().map(|record| record.url).collect(),
            }
        }
        Err(e) => {
            tracing::warn!(%podcast_id, error = %e, "episode lookup failed");
            reporter.report(ProgressEvent::LookupFailed {
                error: e.to_string(),
            });
            RecentEpisodes::default()
        }
    }
}

async fn fetch_recent_episodes<C: HttpClient>(
    client: &C,
    endpoints: &ApiEndpoints,
    podcast_id: PodcastId,
) -> Result<(Option<String>, Vec<EpisodeRecord>), CatalogError> {
    let url = endpoints.episodes_url(podcast_id, LOOKUP_LIMIT)?;
    tracing::debug!(%url, "looking up recent episodes");

    let response = fetch_catalog(client, &url, LOOKUP_TIMEOUT).await?;

    let show_name = response
        .results
        .iter()
        .find(|result| result.is_podcast())
        .and_then(|result| result.collection_name.clone());

    let records = response
        .results
        .iter()
        .filter(|result| !result.is_podcast())
        .filter_map(|result| EpisodeRecord::from_result(podcast_id, result))
        .collect();

    Ok((show_name, records))
}

/// Fetch show metadata (name, artist, feed URL, ...)
pub async fn lookup_podcast_info<C: HttpClient>(
    client: &C,
    endpoints: &ApiEndpoints,
    podcast_id: PodcastId,
) -> Result<PodcastInfo, CatalogError> {
    let url = endpoints.podcast_url(podcast_id)?;
    tracing::debug!(%url, "looking up podcast info");

    let response = fetch_catalog(client, &url, LOOKUP_TIMEOUT).await?;

    response
        .results
        .into_iter()
        .next()
        .map(PodcastInfo::from)
        .ok_or_else(|| CatalogError::NotFound(podcast_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::http::mock::{MockHttpClient, query_param};
    use crate::progress::NoopReporter;
    use crate::progress::recording::RecordingReporter;

    const LOOKUP_BODY: &str = r#"{
        "resultCount": 4,
        "results": [
            {"kind": "podcast", "collectionId": 1141877104, "trackId": 1141877104,
             "collectionName": "Founders", "artistName": "David Senra",
             "primaryGenreName": "Business", "trackCount": 380, "country": "USA",
             "feedUrl": "https://feeds.example.com/founders",
             "collectionViewUrl": "https://podcasts.apple.com/us/podcast/founders/id1141877104"},
            {"kind": "podcast-episode", "collectionId": 1141877104, "trackId": 10, "trackName": "Ep One"},
            {"kind": "podcast-episode", "collectionId": 1141877104, "trackName": "No Id"},
            {"kind": "podcast-episode", "collectionId": 1141877104, "trackId": 11, "trackName": "Ep Two"}
        ]
    }"#;

    fn founders() -> PodcastId {
        PodcastId::new(1141877104)
    }

    #[tokio::test]
    async fn lookup_returns_canonical_urls_in_service_order() {
        let client = MockHttpClient::new(|_| (200, LOOKUP_BODY.to_string()));

        let recent = lookup_recent_episodes(
            &client,
            &ApiEndpoints::default(),
            founders(),
            &NoopReporter::shared(),
        )
        .await;

        assert_eq!(recent.show_name.as_deref(), Some("Founders"));
        assert_eq!(
            recent.urls,
            vec![
                "https://podcasts.apple.com/us/podcast/ep-one/id1141877104?i=10".to_string(),
                "https://podcasts.apple.com/us/podcast/ep-two/id1141877104?i=11".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn lookup_requests_podcast_episodes_with_limit() {
        let client = MockHttpClient::new(|_| (200, LOOKUP_BODY.to_string()));

        lookup_recent_episodes(
            &client,
            &ApiEndpoints::default(),
            founders(),
            &NoopReporter::shared(),
        )
        .await;

        let gets = client.gets();
        assert_eq!(gets.len(), 1);
        assert_eq!(gets[0].path(), "/lookup");
        assert_eq!(query_param(&gets[0], "id").as_deref(), Some("1141877104"));
        assert_eq!(
            query_param(&gets[0], "entity").as_deref(),
            Some("podcastEpisode")
        );
        assert_eq!(query_param(&gets[0], "limit").as_deref(), Some("200"));
    }

    #[tokio::test]
    async fn lookup_http_error_yields_empty_list() {
        let client = MockHttpClient::new(|_| (500, "oops".to_string()));
        let recorder = Arc::new(RecordingReporter::default());
        let reporter: SharedProgressReporter = recorder.clone();

        let recent =
            lookup_recent_episodes(&client, &ApiEndpoints::default(), founders(), &reporter).await;

        assert_eq!(recent, RecentEpisodes::default());
        assert!(
            recorder
                .events()
                .iter()
                .any(|event| matches!(event, ProgressEvent::LookupFailed { .. }))
        );
    }

    #[tokio::test]
    async fn lookup_malformed_body_yields_empty_list() {
        let client = MockHttpClient::new(|_| (200, "<html>not json</html>".to_string()));

        let recent = lookup_recent_episodes(
            &client,
            &ApiEndpoints::default(),
            founders(),
            &NoopReporter::shared(),
        )
        .await;

        assert!(recent.urls.is_empty());
    }

    #[tokio::test]
    async fn lookup_transport_error_yields_empty_list() {
        let client =
            MockHttpClient::new(|_| (200, LOOKUP_BODY.to_string())).with_unreachable(|_| true);
        let recorder = Arc::new(RecordingReporter::default());
        let reporter: SharedProgressReporter = recorder.clone();

        let recent =
            lookup_recent_episodes(&client, &ApiEndpoints::default(), founders(), &reporter).await;

        assert_eq!(recent, RecentEpisodes::default());
        assert_eq!(client.gets().len(), 1);
        assert!(recorder.events().iter().any(|event| matches!(
            event,
            ProgressEvent::LookupFailed { error } if error.starts_with("Catalog request to")
        )));
    }

    #[tokio::test]
    async fn fetch_maps_transport_error_to_request_failed() {
        let client = MockHttpClient::new(|_| (200, String::new())).with_unreachable(|_| true);
        let url = ApiEndpoints::default().podcast_url(founders()).unwrap();

        let err = fetch_catalog(&client, &url, LOOKUP_TIMEOUT)
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::RequestFailed { .. }));
    }

    #[tokio::test]
    async fn lookup_without_show_record_has_no_name() {
        let body = r#"{"results":[
            {"kind":"podcast-episode","collectionId":1141877104,"trackId":10,"trackName":"Ep One"}
        ]}"#;
        let client = MockHttpClient::new(move |_| (200, body.to_string()));

        let recent = lookup_recent_episodes(
            &client,
            &ApiEndpoints::default(),
            founders(),
            &NoopReporter::shared(),
        )
        .await;

        assert_eq!(recent.show_name, None);
        assert_eq!(recent.urls.len(), 1);
    }

    #[tokio::test]
    async fn info_reads_first_result() {
        let client = MockHttpClient::new(|_| (200, LOOKUP_BODY.to_string()));

        let info = lookup_podcast_info(&client, &ApiEndpoints::default(), founders())
            .await
            .unwrap();

        assert_eq!(info.name.as_deref(), Some("Founders"));
        assert_eq!(info.artist.as_deref(), Some("David Senra"));
        assert_eq!(info.episode_count, Some(380));
        assert_eq!(
            info.feed_url.as_deref(),
            Some("https://feeds.example.com/founders")
        );
        assert_eq!(query_param(&client.gets()[0], "entity"), None);
    }

    #[tokio::test]
    async fn info_for_unknown_podcast_is_not_found() {
        let client = MockHttpClient::new(|_| (200, r#"{"resultCount":0,"results":[]}"#.to_string()));

        let err = lookup_podcast_info(&client, &ApiEndpoints::default(), founders())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn info_propagates_http_errors() {
        let client = MockHttpClient::new(|_| (404, String::new()));

        let err = lookup_podcast_info(&client, &ApiEndpoints::default(), founders())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::HttpStatus { status: 404, .. }));
    }
}
