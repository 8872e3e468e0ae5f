// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Timeout for a single existence probe
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause between probes
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_millis(200);

/// Outcome of probing a sample of URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of URLs probed
    pub checked: usize,
    /// Number of probes answered with a 2xx status
    pub accessible: usize,
}

impl ValidationReport {
    /// Share of accessible URLs in percent; 0 when nothing was checked
    pub fn success_rate(&self) -> f64 {
        if self.checked == 0 {
            return 0.0;
        }
        self.accessible as f64 / self.checked as f64 * 100.0
    }
}

/// Probe the first `sample_size` URLs with HEAD requests
///
/// Redirects are followed. A probe that fails for any reason counts as
/// inaccessible; it never aborts the run.
pub async fn validate_urls<C: HttpClient>(
    client: &C,
    urls: &[String],
    sample_size: usize,
    delay: Duration,
    reporter: &SharedProgressReporter,
) -> ValidationReport {
    let sample = &urls[..urls.len().min(sample_size)];
    reporter.report(ProgressEvent::ValidationStarted {
        sample: sample.len(),
    });

    let mut accessible = 0;
    for (i, url) in sample.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(delay).await;
        }

        match client.head(url, PROBE_TIMEOUT).await {
            Ok(status) if (200..300).contains(&status) => accessible += 1,
            Ok(status) => tracing::debug!(%url, status, "URL not accessible"),
            Err(e) => tracing::debug!(%url, error = %e, "URL probe failed"),
        }
    }

    ValidationReport {
        checked: sample.len(),
        accessible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::http::mock::MockHttpClient;
    use crate::progress::NoopReporter;

    fn numbered_urls(count: usize) -> Vec<String> {
        (1..=count)
            .map(|i| format!("https://podcasts.apple.com/us/podcast/ep/id1?i={i}"))
            .collect()
    }

    #[tokio::test]
    async fn probes_exactly_the_sample() {
        let client = MockHttpClient::new(|_| (200, String::new()));
        let urls = numbered_urls(15);

        let report = validate_urls(
            &client,
            &urls,
            10,
            Duration::ZERO,
            &NoopReporter::shared(),
        )
        .await;

        assert_eq!(client.heads(), urls[..10].to_vec());
        assert_eq!(
            report,
            ValidationReport {
                checked: 10,
                accessible: 10
            }
        );
    }

    #[tokio::test]
    async fn short_list_probes_everything() {
        let client = MockHttpClient::new(|_| (200, String::new()));
        let urls = numbered_urls(3);

        let report = validate_urls(
            &client,
            &urls,
            20,
            Duration::ZERO,
            &NoopReporter::shared(),
        )
        .await;

        assert_eq!(client.heads().len(), 3);
        assert_eq!(report.checked, 3);
    }

    #[tokio::test]
    async fn only_2xx_counts_as_accessible() {
        let client = MockHttpClient::new(|_| (200, String::new())).with_head(|url| {
            if url.ends_with("i=2") {
                404
            } else if url.ends_with("i=3") {
                500
            } else {
                204
            }
        });

        let report = validate_urls(
            &client,
            &numbered_urls(4),
            10,
            Duration::ZERO,
            &NoopReporter::shared(),
        )
        .await;

        assert_eq!(report.checked, 4);
        assert_eq!(report.accessible, 2);
        assert!((report.success_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unreachable_url_counts_as_inaccessible() {
        let client = MockHttpClient::new(|_| (200, String::new()))
            .with_unreachable(|url| url.ends_with("i=2"));

        let report = validate_urls(
            &client,
            &numbered_urls(3),
            10,
            Duration::ZERO,
            &NoopReporter::shared(),
        )
        .await;

        assert_eq!(client.heads().len(), 3);
        assert_eq!(
            report,
            ValidationReport {
                checked: 3,
                accessible: 2
            }
        );
    }

    #[test]
    fn empty_report_has_zero_rate() {
        let report = ValidationReport {
            checked: 0,
            accessible: 0,
        };
        assert_eq!(report.success_rate(), 0.0);
    }
}
