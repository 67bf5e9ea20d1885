//! Catalog HTTP client
//!
//! Implements the `CatalogApi` trait against the catalog server.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest};
use bridge_traits::{CatalogApi, RemotePlaylist, RemoteSection};
use core_runtime::config::CoreConfig;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{CatalogApiError, Result};

/// Relative path of the home feed endpoint
const FEED_PATH: &str = "feed";

/// Catalog API client over an injected `HttpClient`
///
/// # Example
///
/// ```ignore
/// use provider_catalog_api::HttpCatalogApi;
/// use bridge_traits::CatalogApi;
///
/// let api = HttpCatalogApi::new(http_client, "http://10.0.2.2:8080/");
/// let sections = api.home_feed().await?;
/// ```
pub struct HttpCatalogApi {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Server root, always ending with `/`
    base_url: String,

    /// Per-request timeout, none by default
    timeout: Option<Duration>,
}

impl HttpCatalogApi {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            http_client,
            base_url,
            timeout: None,
        }
    }

    /// Client for the server, transport and timeout named in `config`
    pub fn from_config(config: &CoreConfig) -> Self {
        let api = Self::new(Arc::clone(&config.http_client), config.api_base_url.clone());
        match config.request_timeout {
            Some(timeout) => api.with_timeout(timeout),
            None => api,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn playlist_path(album_id: i64) -> String {
        format!("playlist/{}", album_id)
    }

    /// One GET, decoded as JSON
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);

        let mut request = HttpRequest::get(url.clone()).accept_json();
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = self
            .http_client
            .execute(request)
            .await?
            .error_for_status(&url)
            .map_err(|e| match e {
                BridgeError::HttpStatus { status, url } => {
                    warn!(status, url = %url, "Catalog request failed");
                    CatalogApiError::Status {
                        status_code: status,
                        url,
                    }
                }
                other => CatalogApiError::from(other),
            })?;

        response.json::<T>().map_err(|e| match e {
            BridgeError::EmptyBody(_) => CatalogApiError::EmptyBody { url: url.clone() },
            other => CatalogApiError::ParseError {
                url: url.clone(),
                message: other.to_string(),
            },
        })
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    #[instrument(skip(self))]
    async fn home_feed(&self) -> BridgeResult<Vec<RemoteSection>> {
        let sections: Vec<RemoteSection> = self.get_json(FEED_PATH).await?;
        debug!(sections = sections.len(), "Fetched home feed");
        Ok(sections)
    }

    #[instrument(skip(self))]
    async fn playlist(&self, album_id: i64) -> BridgeResult<RemotePlaylist> {
        let playlist: RemotePlaylist = self.get_json(&Self::playlist_path(album_id)).await?;
        debug!(songs = playlist.songs.len(), "Fetched playlist");
        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::http::{HttpMethod, HttpResponse};
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    const BASE: &str = "http://10.0.2.2:8080/";

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn test_base_url_normalized() {
        let api = HttpCatalogApi::new(Arc::new(MockHttpClient::new()), "http://localhost:8080");
        assert_eq!(api.base_url(), "http://localhost:8080/");
        assert_eq!(api.endpoint("feed"), "http://localhost:8080/feed");
    }

    #[tokio::test]
    async fn test_home_feed_success() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| {
                req.method == HttpMethod::Get
                    && req.url == "http://10.0.2.2:8080/feed"
                    && req.headers.get("Accept").map(String::as_str) == Some("application/json")
            })
            .times(1)
            .returning(|_| {
                Ok(response(
                    200,
                    r#"[
                        {
                            "section_title": "Made for you",
                            "albums": [
                                {"id": 1, "name": "Hexagonal", "year": "2008",
                                 "cover": "https://img/1.jpg", "artists": "Leessang",
                                 "description": "Fifth album"}
                            ]
                        },
                        {"section_title": "Recently played", "albums": []}
                    ]"#,
                ))
            });

        let api = HttpCatalogApi::new(Arc::new(mock_http), BASE);
        let sections = api.home_feed().await.unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section_title, "Made for you");
        assert_eq!(sections[0].albums[0].artists, "Leessang");
        assert!(sections[1].albums.is_empty());
    }

    #[tokio::test]
    async fn test_playlist_success() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| req.url == "http://10.0.2.2:8080/playlist/2")
            .times(1)
            .returning(|_| {
                Ok(response(
                    200,
                    r#"{
                        "album": {"id": 2, "name": "Baby Love", "year": "2011",
                                  "cover": "", "artists": "Leessang", "description": ""},
                        "songs": [
                            {"name": "s1", "length": "3:01"},
                            {"name": "s2", "length": "4:12"}
                        ]
                    }"#,
                ))
            });

        let api = HttpCatalogApi::new(Arc::new(mock_http), BASE);
        let playlist = api.playlist(2).await.unwrap();

        assert_eq!(playlist.album.as_ref().map(|a| a.id), Some(2));
        let titles: Vec<&str> = playlist.songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["s1", "s2"]);
        assert_eq!(playlist.songs[1].duration, "4:12");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(response(404, "not found")));

        let api = HttpCatalogApi::new(Arc::new(mock_http), BASE);
        let err = api.playlist(77).await.unwrap_err();

        match err {
            BridgeError::HttpStatus { status, url } => {
                assert_eq!(status, 404);
                assert_eq!(url, "http://10.0.2.2:8080/playlist/77");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(response(200, "")));

        let api = HttpCatalogApi::new(Arc::new(mock_http), BASE);
        let err = api.playlist(1).await.unwrap_err();
        assert!(matches!(err, BridgeError::EmptyBody(url) if url.ends_with("playlist/1")));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(response(200, r#"{"sections": "nope"}"#)));

        let api = HttpCatalogApi::new(Arc::new(mock_http), BASE);
        let err = api.home_feed().await.unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("connection refused".to_string())));

        let api = HttpCatalogApi::new(Arc::new(mock_http), BASE);
        let err = api.home_feed().await.unwrap_err();
        assert!(matches!(err, BridgeError::OperationFailed(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_forwarded() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| req.timeout == Some(Duration::from_secs(5)))
            .times(1)
            .returning(|_| Ok(response(200, "[]")));

        let api = HttpCatalogApi::new(Arc::new(mock_http), BASE).with_timeout(Duration::from_secs(5));
        assert!(api.home_feed().await.unwrap().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = CoreConfig::builder()
            .http_client(Arc::new(MockHttpClient::new()))
            .api_base_url("http://192.168.1.20:8080")
            .request_timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        let api = HttpCatalogApi::from_config(&config);
        assert_eq!(api.base_url(), "http://192.168.1.20:8080/");
        assert_eq!(api.timeout, Some(Duration::from_secs(10)));
    }
}
