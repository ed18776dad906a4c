//! Fetch-once caching of the services and hero-video collections.
//!
//! A mount reads the resource's load state and only fetches from
//! not-loaded. The not-loaded → loading transition is dispatched before the
//! first suspension point, so every later mount in the same tick observes
//! `Loading` and skips. Failures park the resource in `Error`; it is only
//! fetched again after [`ContentCache::clear_error`].

use crate::core::query::{fetch_list, Query};
use crate::core::store::{Action, Resource, Store};
use crate::domain::model::{LoadState, Service, Video};
use crate::domain::ports::ContentSource;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct ContentCache {
    store: Store,
    source: Arc<dyn ContentSource>,
}

impl ContentCache {
    pub fn new(store: Store, source: Arc<dyn ContentSource>) -> Self {
        Self { store, source }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Claims the fetch for `resource` if nobody has yet. Synchronous.
    fn claim(&self, resource: Resource) -> bool {
        let claimed = self.store.dispatch(Action::FetchStarted(resource));
        if !claimed {
            tracing::debug!(
                "Skipping {:?} fetch, state is {:?}",
                resource,
                self.store.read(|s| s.load_state(resource))
            );
        }
        claimed
    }

    /// Component-mount entry point: claims synchronously, then fetches in the
    /// background. Returns the fetch task when this mount started one.
    pub fn mount(&self, resource: Resource) -> Option<JoinHandle<()>> {
        if !self.claim(resource) {
            return None;
        }
        let cache = self.clone();
        Some(tokio::spawn(async move {
            cache.complete_fetch(resource).await;
        }))
    }

    /// Awaitable variant of [`mount`](Self::mount). A call that finds the
    /// fetch already in flight waits for it to settle instead of fetching.
    pub async fn ensure_loaded(&self, resource: Resource) -> LoadState {
        if self.claim(resource) {
            self.complete_fetch(resource).await;
            return self.store.read(|s| s.load_state(resource));
        }

        let mut updates = self.store.subscribe();
        let settled = updates
            .wait_for(|s| s.load_state(resource) != LoadState::Loading)
            .await
            .map(|s| s.load_state(resource));
        settled.unwrap_or(LoadState::Loading)
    }

    pub fn clear_error(&self, resource: Resource) -> bool {
        self.store.dispatch(Action::ClearError(resource))
    }

    async fn complete_fetch(&self, resource: Resource) {
        let query = Query::populate_all();
        let source = self.source.as_ref();
        let action = match resource {
            Resource::Services => match fetch_list::<Service>(source, resource.path(), &query).await {
                Ok(services) => {
                    tracing::info!("Loaded {} services", services.len());
                    Action::ServicesLoaded(services)
                }
                Err(e) => {
                    tracing::error!("Error fetching services: {}", e);
                    Action::FetchFailed(resource, e.to_string())
                }
            },
            Resource::Videos => match fetch_list::<Video>(source, resource.path(), &query).await {
                Ok(videos) => {
                    tracing::info!("Loaded {} hero videos", videos.len());
                    Action::VideosLoaded(videos)
                }
                Err(e) => {
                    tracing::error!("Error fetching videos: {}", e);
                    Action::FetchFailed(resource, e.to_string())
                }
            },
        };
        self.store.dispatch(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::QueryParams;
    use crate::utils::error::{Result, SiteError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ContentSource for CountingSource {
        async fn fetch_collection(&self, path: &str, _query: &QueryParams) -> Result<serde_json::Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail {
                return Err(SiteError::Http {
                    status: 502,
                    message: "bad gateway".to_string(),
                });
            }
            Ok(match path {
                "/services" => json!({ "data": [{ "id": 1, "slug": "contracts", "title": "Contracts" }] }),
                _ => json!({ "data": [{ "id": 1, "background": [] }] }),
            })
        }

        async fn submit_record(&self, _path: &str, _payload: &serde_json::Value) -> Result<serde_json::Value> {
            unreachable!("cache never writes")
        }

        fn resolve_media_url(&self, url: Option<&str>) -> Option<String> {
            url.map(str::to_string)
        }
    }

    fn cache(fail: bool) -> (ContentCache, Arc<CountingSource>) {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail,
        });
        (ContentCache::new(Store::new(), source.clone()), source)
    }

    #[tokio::test]
    async fn test_many_mounts_one_fetch() {
        let (cache, source) = cache(false);

        let handles: Vec<_> = (0..5).filter_map(|_| cache.mount(Resource::Services)).collect();
        assert_eq!(handles.len(), 1);
        assert_eq!(cache.store().read(|s| s.load_state(Resource::Services)), LoadState::Loading);

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        let state = cache.store().state();
        assert_eq!(state.services.list.load_state, LoadState::Loaded);
        assert!(state.services.by_slug("contracts").is_some());

        assert!(cache.mount(Resource::Services).is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_ensure_calls_share_one_fetch() {
        let (cache, source) = cache(false);
        let states = futures::future::join_all((0..4).map(|_| cache.ensure_loaded(Resource::Videos))).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(states, vec![LoadState::Loaded; 4]);
        assert_eq!(cache.store().state().videos.items.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_retried_until_cleared() {
        let (cache, source) = cache(true);

        assert_eq!(cache.ensure_loaded(Resource::Services).await, LoadState::Error);
        assert_eq!(cache.ensure_loaded(Resource::Services).await, LoadState::Error);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(cache.store().read(|s| s.error(Resource::Services).is_some()));

        assert!(cache.clear_error(Resource::Services));
        cache.ensure_loaded(Resource::Services).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
