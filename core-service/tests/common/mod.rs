//! Shared fixtures for the controller tests

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BridgeError, CatalogApi, HttpClient, HttpRequest, HttpResponse, RemoteAlbum, RemotePlaylist,
    RemoteSection, RemoteSong,
};
use core_service::{CoreConfig, CoreService};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{watch, Notify};

/// Transport that must never be reached; the fake catalog answers instead.
pub struct UnreachableHttp;

#[async_trait]
impl HttpClient for UnreachableHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        Err(BridgeError::NotAvailable(request.url))
    }
}

/// In-process catalog server with per-album response gates.
#[derive(Default)]
pub struct FakeCatalog {
    playlists: HashMap<i64, RemotePlaylist>,
    gates: HashMap<i64, Arc<Notify>>,
    feed: Mutex<Vec<RemoteSection>>,
    feed_gate: Mutex<Option<Arc<Notify>>>,
    feed_calls: AtomicUsize,
    feed_fails: AtomicBool,
}

impl FakeCatalog {
    pub fn with_playlist(mut self, album_id: i64, titles: &[&str]) -> Self {
        let songs = titles
            .iter()
            .map(|title| RemoteSong {
                title: title.to_string(),
                duration: "3:00".to_string(),
                position: None,
                src: None,
                lyric: None,
            })
            .collect();

        self.playlists.insert(
            album_id,
            RemotePlaylist {
                album: Some(RemoteAlbum {
                    id: album_id,
                    name: format!("Album {}", album_id),
                    ..RemoteAlbum::default()
                }),
                songs,
            },
        );
        self
    }

    /// Hold the playlist response for `album_id` until the returned gate is
    /// notified.
    pub fn gated(mut self, album_id: i64) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gates.insert(album_id, Arc::clone(&gate));
        (self, gate)
    }

    pub fn with_feed(self, sections: Vec<RemoteSection>) -> Self {
        self.set_feed(sections);
        self
    }

    /// Hold the next feed response until the returned gate is notified. The
    /// held response carries the feed as it was when the request arrived.
    pub fn gated_feed(self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        *self.feed_gate.lock().unwrap() = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn set_feed(&self, sections: Vec<RemoteSection>) {
        *self.feed.lock().unwrap() = sections;
    }

    /// Wait until `count` feed requests have reached the server.
    pub async fn wait_for_feed_calls(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.feed_calls.load(Ordering::SeqCst) < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("feed was not requested in time");
    }

    pub fn fail_feed(&self, fail: bool) {
        self.feed_fails.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn home_feed(&self) -> BridgeResult<Vec<RemoteSection>> {
        self.feed_calls.fetch_add(1, Ordering::SeqCst);
        let sections = self.feed.lock().unwrap().clone();
        let gate = self.feed_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.feed_fails.load(Ordering::SeqCst) {
            return Err(BridgeError::HttpStatus {
                status: 503,
                url: "http://10.0.2.2:8080/feed".to_string(),
            });
        }
        Ok(sections)
    }

    async fn playlist(&self, album_id: i64) -> BridgeResult<RemotePlaylist> {
        if let Some(gate) = self.gates.get(&album_id) {
            gate.notified().await;
        }

        self.playlists
            .get(&album_id)
            .cloned()
            .ok_or_else(|| BridgeError::HttpStatus {
                status: 404,
                url: format!("http://10.0.2.2:8080/playlist/{}", album_id),
            })
    }
}

pub async fn core_with(api: Arc<FakeCatalog>) -> CoreService {
    let config = CoreConfig::builder()
        .http_client(Arc::new(UnreachableHttp))
        .in_memory_database()
        .build()
        .expect("valid config");

    CoreService::bootstrap_with_api(config, api)
        .await
        .expect("core bootstraps")
}

/// Wait until the watched state satisfies `predicate`.
pub async fn wait_until<T: Clone>(
    rx: &mut watch::Receiver<T>,
    predicate: impl FnMut(&T) -> bool,
) -> T {
    let value = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("state did not reach the expected value in time")
        .expect("state holder dropped");
    T::clone(&value)
}

/// Give background tasks a chance to (wrongly) run.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
