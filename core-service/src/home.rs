//! Home screen controller

use core_catalog::{FeedRepository, Section};
use core_runtime::{BackgroundContext, TaskGroup};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;
use tracing::error;

use crate::state::StateHolder;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HomeUiState {
    pub sections: Vec<Section>,
    pub is_loading: bool,
}

pub struct HomeViewModel {
    feed: FeedRepository,
    state: StateHolder<HomeUiState>,
    tasks: TaskGroup,
    in_flight: Mutex<Option<TaskGroup>>,
}

impl HomeViewModel {
    pub fn new(feed: FeedRepository, context: BackgroundContext) -> Self {
        Self {
            feed,
            state: StateHolder::new(HomeUiState::default()),
            tasks: TaskGroup::new(context),
            in_flight: Mutex::new(None),
        }
    }

    pub fn state(&self) -> HomeUiState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<HomeUiState> {
        self.state.subscribe()
    }

    /// Load the feed. On failure the previous sections stay in place.
    ///
    /// A new refresh supersedes one still in flight.
    pub fn refresh(&self) {
        let group = self.tasks.child();
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = in_flight.take() {
            previous.cancel();
        }

        self.state.update_if(|current| {
            current.is_loading = true;
            true
        });

        let feed = self.feed.clone();
        let state = self.state.clone();
        group.spawn(async move {
            match feed.home_feed().await {
                Ok(sections) => state.set(HomeUiState {
                    sections,
                    is_loading: false,
                }),
                Err(err) => {
                    error!(error = %err, "Home feed fetch failed");
                    state.update_if(|current| {
                        current.is_loading = false;
                        true
                    });
                }
            }
        });
        *in_flight = Some(group);
    }

    pub fn close(&self) {
        self.tasks.cancel();
    }
}
