//! Home feed repository

use crate::error::Result;
use crate::models::Section;
use bridge_traits::CatalogApi;
use core_runtime::BackgroundContext;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Fetches the home feed on the background context.
#[derive(Clone)]
pub struct FeedRepository {
    api: Arc<dyn CatalogApi>,
    context: BackgroundContext,
}

impl FeedRepository {
    pub fn new(api: Arc<dyn CatalogApi>, context: BackgroundContext) -> Self {
        Self { api, context }
    }

    #[instrument(skip(self))]
    pub async fn home_feed(&self) -> Result<Vec<Section>> {
        let api = Arc::clone(&self.api);
        let remote = self
            .context
            .run(async move { api.home_feed().await })
            .await??;

        debug!(sections = remote.len(), "Home feed fetched");
        Ok(remote.into_iter().map(Section::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::MockCatalogApi;
    use crate::{Album, CatalogError};
    use bridge_traits::{BridgeError, RemoteAlbum, RemoteSection};

    #[tokio::test]
    async fn test_home_feed_keeps_order() {
        let mut api = MockCatalogApi::new();
        api.expect_home_feed().times(1).returning(|| {
            Ok(vec![
                RemoteSection {
                    section_title: "Made for you".to_string(),
                    albums: vec![RemoteAlbum {
                        id: 1,
                        name: "Hexagonal".to_string(),
                        ..RemoteAlbum::default()
                    }],
                },
                RemoteSection {
                    section_title: "Recently played".to_string(),
                    albums: vec![],
                },
            ])
        });

        let repo = FeedRepository::new(Arc::new(api), BackgroundContext::current().unwrap());
        let sections = repo.home_feed().await.unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section_title, "Made for you");
        assert_eq!(sections[0].albums, vec![Album::new(1, "Hexagonal")]);
        assert!(sections[1].albums.is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_propagates() {
        let mut api = MockCatalogApi::new();
        api.expect_home_feed()
            .returning(|| Err(BridgeError::EmptyBody("feed".to_string())));

        let repo = FeedRepository::new(Arc::new(api), BackgroundContext::current().unwrap());
        let err = repo.home_feed().await.unwrap_err();
        assert!(matches!(err, CatalogError::Bridge(BridgeError::EmptyBody(_))));
    }
}
