// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::USER_AGENT;
use url::Url;

/// User agent sent with existence probes; store pages reject unknown agents
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// HTTP response with status and fully buffered body
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction for testability
///
/// Every call carries its own timeout. A timeout surfaces as an ordinary
/// `reqwest::Error`, which callers treat like any other transport failure.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a GET request and buffer the whole body
    async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, reqwest::Error>;

    /// Issue a HEAD request, following redirects, and return the final status
    async fn head(&self, url: &str, timeout: Duration) -> Result<u16, reqwest::Error>;
}

/// Default HTTP client implementation using reqwest
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new ReqwestClient with default settings
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, reqwest::Error> {
        let response = self
            .client
            .get(url.as_str())
            .timeout(timeout)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(HttpResponse { status, body })
    }

    async fn head(&self, url: &str, timeout: Duration) -> Result<u16, reqwest::Error> {
        let response = self
            .client
            .head(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .timeout(timeout)
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reqwest_client_can_be_created() {
        let _client = ReqwestClient::new();
        let _client_default = ReqwestClient::default();
    }

    #[test]
    fn reqwest_client_can_be_cloned() {
        let client = ReqwestClient::new();
        let _cloned = client.clone();
    }

    #[tokio::test]
    async fn mock_fails_unreachable_urls() {
        let client = mock::MockHttpClient::new(|_| (200, String::new()))
            .with_unreachable(|url| url.contains("down"));
        let down = Url::parse("https://down.example.com/").unwrap();
        let up = Url::parse("https://up.example.com/").unwrap();

        assert!(client.get(&down, Duration::ZERO).await.is_err());
        assert!(client.head(down.as_str(), Duration::ZERO).await.is_err());
        assert_eq!(client.get(&up, Duration::ZERO).await.unwrap().status, 200);
        assert_eq!(client.gets().len(), 2);
        assert_eq!(client.heads().len(), 1);
    }

    #[test]
    fn success_covers_2xx_only() {
        let response = |status| HttpResponse {
            status,
            body: Bytes::new(),
        };

        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(301).is_success());
        assert!(!response(403).is_success());
        assert!(!response(500).is_success());
    }
}
