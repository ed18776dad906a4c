//! Search over team members and services.
//!
//! [`SearchService::run`] issues both collection queries concurrently and
//! merges them only when both succeed. [`DebouncedSearch`] sits in front of
//! it: the visible query updates on every keystroke while the network
//! search waits for a pause in typing.

use crate::core::query::{fetch_list, Query};
use crate::core::store::{Action, Store};
use crate::domain::model::{SearchCategory, SearchResult, Service, TeamMember};
use crate::domain::ports::ContentSource;
use crate::utils::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

static NEXT_RUN: AtomicU64 = AtomicU64::new(1);

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Clone)]
pub struct SearchService {
    store: Store,
    source: Arc<dyn ContentSource>,
}

impl SearchService {
    pub fn new(store: Store, source: Arc<dyn ContentSource>) -> Self {
        Self { store, source }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    async fn query_both(&self, term: &str) -> Result<Vec<SearchResult>> {
        let source = self.source.as_ref();
        let team_query = Query::populate_all().contains_ci("name", term);
        let service_query = Query::populate_all().contains_ci("title", term);

        let (team, services) = tokio::join!(
            fetch_list::<TeamMember>(source, "/team-members", &team_query),
            fetch_list::<Service>(source, "/services", &service_query),
        );
        let (team, services) = (team?, services?);

        let team_results = team.into_iter().map(|member| SearchResult {
            image: source.resolve_media_url(member.image_url()),
            id: member.document_id,
            title: member.name,
            category: SearchCategory::TeamMember,
            description: non_empty(&member.role),
        });
        let service_results = services.into_iter().map(|service| SearchResult {
            image: source.resolve_media_url(service.icon_url()),
            id: service.document_id,
            title: service.title,
            category: SearchCategory::Service,
            description: non_empty(&service.description),
        });

        Ok(team_results.chain(service_results).collect())
    }

    /// Searches for `query` and publishes the merged results.
    ///
    /// Blank queries resolve to an empty list without touching the network.
    /// A failure on either side yields an empty list. Results for a query the
    /// user has since replaced are dropped, and the loading flag is left to
    /// whichever search started last.
    pub async fn run(&self, query: &str) -> Vec<SearchResult> {
        let term = query.trim();
        if term.is_empty() {
            self.store.dispatch(Action::SetResults(Vec::new()));
            self.store.dispatch(Action::SetSearchLoading(false));
            return Vec::new();
        }

        let run = NEXT_RUN.fetch_add(1, Ordering::Relaxed);
        self.store.dispatch(Action::SearchStarted(run));

        let results = match self.query_both(term).await {
            Ok(results) => {
                tracing::debug!("Search '{}' matched {} results", term, results.len());
                results
            }
            Err(e) => {
                tracing::error!("Search error for '{}': {}", term, e);
                Vec::new()
            }
        };

        self.store.dispatch(Action::SearchFinished {
            run,
            term: term.to_string(),
            results: results.clone(),
        });
        results
    }
}

/// Delays searches until typing pauses. A new keystroke cancels the pending
/// search; a search that already started runs to completion.
pub struct DebouncedSearch {
    search: SearchService,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedSearch {
    pub fn new(search: SearchService, delay: Duration) -> Self {
        Self {
            search,
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn on_input_change(&self, value: &str) {
        self.search.store().dispatch(Action::SetQuery(value.to_string()));

        let search = self.search.clone();
        let delay = self.delay;
        let value = value.to_string();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(async move {
                search.run(&value).await;
            });
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(timer) {
            previous.abort();
        }
    }

    /// Drops any search still waiting on its delay.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }

    /// Closes the search modal: cancels the pending search and clears state.
    pub fn close(&self) {
        self.cancel();
        let store = self.search.store();
        store.dispatch(Action::ClearSearch);
        if store.read(|s| s.ui.is_search_open) {
            store.dispatch(Action::ToggleSearch);
        }
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}
