//! Application state container.
//!
//! All state lives in one [`AppState`] value. The only way to change it is
//! to [`Store::dispatch`] an [`Action`], which runs the pure [`reduce`]
//! function under the container's lock, so every session sees a single total
//! order of transitions. Readers get snapshots or a borrowed view and can
//! watch for changes through [`Store::subscribe`].

use crate::domain::locale::Locale;
use crate::domain::model::{LoadState, SearchCategory, SearchResult, Service, Video};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub language: Locale,
    pub is_loading: bool,
    pub is_search_open: bool,
    pub is_mobile_menu_open: bool,
}

/// A list fetched at most once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedList<T> {
    pub items: Vec<T>,
    pub load_state: LoadState,
    pub error: Option<String>,
}

impl<T> Default for CachedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            load_state: LoadState::NotLoaded,
            error: None,
        }
    }
}

impl<T> CachedList<T> {
    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicesState {
    pub list: CachedList<Service>,
    by_slug: HashMap<String, usize>,
}

impl ServicesState {
    pub fn services(&self) -> &[Service] {
        &self.list.items
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Service> {
        self.by_slug.get(slug).and_then(|&i| self.list.items.get(i))
    }

    fn replace(&mut self, services: Vec<Service>) {
        let mut by_slug = HashMap::with_capacity(services.len());
        for (i, service) in services.iter().enumerate() {
            if service.slug.is_empty() {
                continue;
            }
            if by_slug.contains_key(&service.slug) {
                tracing::warn!("Duplicate service slug '{}' ignored for lookup", service.slug);
                continue;
            }
            by_slug.insert(service.slug.clone(), i);
        }
        self.list.items = services;
        self.by_slug = by_slug;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub is_loading: bool,
    pub has_searched: bool,
    /// Id of the most recently started search. Only that search may clear
    /// `is_loading`.
    pub latest_run: u64,
}

impl SearchState {
    pub fn results_in(&self, category: SearchCategory) -> impl Iterator<Item = &SearchResult> {
        self.results.iter().filter(move |r| r.category == category)
    }

    pub fn team_results(&self) -> Vec<&SearchResult> {
        self.results_in(SearchCategory::TeamMember).collect()
    }

    pub fn service_results(&self) -> Vec<&SearchResult> {
        self.results_in(SearchCategory::Service).collect()
    }

    /// "No results" is shown only after a completed search for a non-blank
    /// query that matched nothing. An empty list caused by a blank query
    /// stays silent.
    pub fn show_no_results(&self) -> bool {
        self.has_searched
            && !self.is_loading
            && !self.query.trim().is_empty()
            && self.results.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub ui: UiState,
    pub services: ServicesState,
    pub videos: CachedList<Video>,
    pub search: SearchState,
}

impl AppState {
    pub fn load_state(&self, resource: Resource) -> LoadState {
        match resource {
            Resource::Services => self.services.list.load_state,
            Resource::Videos => self.videos.load_state,
        }
    }

    pub fn error(&self, resource: Resource) -> Option<&str> {
        match resource {
            Resource::Services => self.services.list.error.as_deref(),
            Resource::Videos => self.videos.error.as_deref(),
        }
    }
}

/// Session-cached collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Services,
    Videos,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Services => "/services",
            Resource::Videos => "/videos",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetLanguage(Locale),
    SetLoading(bool),
    ToggleSearch,
    ToggleMobileMenu,
    /// Closes the search modal and the mobile menu, used on navigation.
    CloseAll,

    FetchStarted(Resource),
    ServicesLoaded(Vec<Service>),
    VideosLoaded(Vec<Video>),
    FetchFailed(Resource, String),
    /// Re-arms a failed resource so the next mount fetches again.
    ClearError(Resource),
    /// Drops cached data and returns the resource to not-loaded.
    Reset(Resource),

    SetQuery(String),
    SetResults(Vec<SearchResult>),
    SetSearchLoading(bool),
    /// A network search for the current query began.
    SearchStarted(u64),
    /// A network search ended. Results land only if `term` still matches
    /// the query; the loading flag clears only if no later search started.
    SearchFinished {
        run: u64,
        term: String,
        results: Vec<SearchResult>,
    },
    ClearSearch,
}

fn list_mut<'a>(state: &'a mut AppState, resource: Resource) -> (&'a mut LoadState, &'a mut Option<String>) {
    match resource {
        Resource::Services => (
            &mut state.services.list.load_state,
            &mut state.services.list.error,
        ),
        Resource::Videos => (&mut state.videos.load_state, &mut state.videos.error),
    }
}

fn clear_items(state: &mut AppState, resource: Resource) {
    match resource {
        Resource::Services => state.services.replace(Vec::new()),
        Resource::Videos => state.videos.items.clear(),
    }
}

/// Applies `action` to `state`. Returns whether anything changed.
///
/// Load states only move not-loaded → loading → {loaded, error}. A
/// completion that arrives while the resource is not loading is stale and
/// dropped.
pub fn reduce(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::SetLanguage(locale) => {
            let changed = state.ui.language != locale;
            state.ui.language = locale;
            changed
        }
        Action::SetLoading(loading) => {
            let changed = state.ui.is_loading != loading;
            state.ui.is_loading = loading;
            changed
        }
        Action::ToggleSearch => {
            state.ui.is_search_open = !state.ui.is_search_open;
            true
        }
        Action::ToggleMobileMenu => {
            state.ui.is_mobile_menu_open = !state.ui.is_mobile_menu_open;
            true
        }
        Action::CloseAll => {
            let changed = state.ui.is_search_open || state.ui.is_mobile_menu_open;
            state.ui.is_search_open = false;
            state.ui.is_mobile_menu_open = false;
            changed
        }

        Action::FetchStarted(resource) => {
            let (load_state, error) = list_mut(state, resource);
            if *load_state != LoadState::NotLoaded {
                return false;
            }
            *load_state = LoadState::Loading;
            *error = None;
            true
        }
        Action::ServicesLoaded(services) => {
            if state.services.list.load_state != LoadState::Loading {
                tracing::warn!("Dropping services result that arrived outside a fetch");
                return false;
            }
            state.services.replace(services);
            state.services.list.load_state = LoadState::Loaded;
            state.services.list.error = None;
            true
        }
        Action::VideosLoaded(videos) => {
            if state.videos.load_state != LoadState::Loading {
                tracing::warn!("Dropping videos result that arrived outside a fetch");
                return false;
            }
            state.videos.items = videos;
            state.videos.load_state = LoadState::Loaded;
            state.videos.error = None;
            true
        }
        Action::FetchFailed(resource, message) => {
            if state.load_state(resource) != LoadState::Loading {
                return false;
            }
            clear_items(state, resource);
            let (load_state, error) = list_mut(state, resource);
            *load_state = LoadState::Error;
            *error = Some(message);
            true
        }
        Action::ClearError(resource) => {
            let (load_state, error) = list_mut(state, resource);
            if *load_state != LoadState::Error {
                return false;
            }
            *load_state = LoadState::NotLoaded;
            *error = None;
            true
        }
        Action::Reset(resource) => {
            if !state.load_state(resource).is_terminal() {
                return false;
            }
            clear_items(state, resource);
            let (load_state, error) = list_mut(state, resource);
            *load_state = LoadState::NotLoaded;
            *error = None;
            true
        }

        Action::SetQuery(query) => {
            let changed = state.search.query != query;
            state.search.query = query;
            changed
        }
        Action::SetResults(results) => {
            state.search.results = results;
            state.search.has_searched = true;
            true
        }
        Action::SetSearchLoading(loading) => {
            let changed = state.search.is_loading != loading;
            state.search.is_loading = loading;
            changed
        }
        Action::SearchStarted(run) => {
            state.search.latest_run = run;
            state.search.is_loading = true;
            true
        }
        Action::SearchFinished { run, term, results } => {
            if run != state.search.latest_run {
                return false;
            }
            state.search.is_loading = false;
            if state.search.query.trim() == term {
                state.search.results = results;
                state.search.has_searched = true;
            } else {
                tracing::warn!(
                    "Ignoring stale results for '{}', query is now '{}'",
                    term,
                    state.search.query.trim()
                );
            }
            true
        }
        Action::ClearSearch => {
            state.search.query.clear();
            state.search.results.clear();
            state.search.is_loading = false;
            state.search.has_searched = false;
            true
        }
    }
}

/// Injectable handle to the session state. Clones share the same state.
#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<AppState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("state", &*self.tx.borrow()).finish()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    pub fn dispatch(&self, action: Action) -> bool {
        tracing::trace!("dispatch {:?}", action);
        self.tx.send_if_modified(|state| reduce(state, action))
    }

    pub fn state(&self) -> AppState {
        self.tx.borrow().clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(slug: &str) -> Service {
        Service {
            id: 1,
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            ..Service::default()
        }
    }

    #[test]
    fn test_ui_toggles_are_independent() {
        let store = Store::new();
        store.dispatch(Action::ToggleSearch);
        assert!(store.read(|s| s.ui.is_search_open));
        assert!(!store.read(|s| s.ui.is_mobile_menu_open));

        store.dispatch(Action::ToggleMobileMenu);
        store.dispatch(Action::ToggleSearch);
        let ui = store.state().ui;
        assert!(!ui.is_search_open);
        assert!(ui.is_mobile_menu_open);

        store.dispatch(Action::ToggleSearch);
        assert!(store.dispatch(Action::CloseAll));
        let ui = store.state().ui;
        assert!(!ui.is_search_open && !ui.is_mobile_menu_open);
        assert!(!store.dispatch(Action::CloseAll));
    }

    #[test]
    fn test_load_state_follows_lifecycle() {
        let mut state = AppState::default();
        assert!(!reduce(&mut state, Action::ServicesLoaded(vec![service("a")])));
        assert_eq!(state.services.list.load_state, LoadState::NotLoaded);

        assert!(reduce(&mut state, Action::FetchStarted(Resource::Services)));
        assert!(!reduce(&mut state, Action::FetchStarted(Resource::Services)));
        assert_eq!(state.services.list.load_state, LoadState::Loading);

        assert!(reduce(&mut state, Action::ServicesLoaded(vec![service("a")])));
        assert_eq!(state.services.list.load_state, LoadState::Loaded);

        assert!(!reduce(&mut state, Action::FetchStarted(Resource::Services)));
        assert!(!reduce(&mut state, Action::FetchFailed(Resource::Services, "late".into())));
        assert_eq!(state.services.list.load_state, LoadState::Loaded);
        assert_eq!(state.services.services().len(), 1);

        assert!(reduce(&mut state, Action::Reset(Resource::Services)));
        assert_eq!(state.services.list.load_state, LoadState::NotLoaded);
        assert!(state.services.services().is_empty());
        assert!(!reduce(&mut state, Action::Reset(Resource::Services)));

        reduce(&mut state, Action::FetchStarted(Resource::Services));
        assert!(!reduce(&mut state, Action::Reset(Resource::Services)));
        assert_eq!(state.services.list.load_state, LoadState::Loading);
    }

    #[test]
    fn test_failure_is_terminal_until_cleared() {
        let mut state = AppState::default();
        reduce(&mut state, Action::FetchStarted(Resource::Videos));
        reduce(&mut state, Action::FetchFailed(Resource::Videos, "timeout".into()));
        assert_eq!(state.videos.load_state, LoadState::Error);
        assert_eq!(state.error(Resource::Videos), Some("timeout"));
        assert!(state.videos.items.is_empty());

        assert!(!reduce(&mut state, Action::FetchStarted(Resource::Videos)));

        assert!(reduce(&mut state, Action::ClearError(Resource::Videos)));
        assert_eq!(state.videos.load_state, LoadState::NotLoaded);
        assert_eq!(state.error(Resource::Videos), None);
        assert!(reduce(&mut state, Action::FetchStarted(Resource::Videos)));
    }

    #[test]
    fn test_slug_lookup_keeps_first_duplicate() {
        let mut state = AppState::default();
        reduce(&mut state, Action::FetchStarted(Resource::Services));
        let mut dup = service("family-law");
        dup.id = 2;
        reduce(
            &mut state,
            Action::ServicesLoaded(vec![service("family-law"), dup, service("corporate")]),
        );
        assert_eq!(state.services.by_slug("family-law").map(|s| s.id), Some(1));
        assert_eq!(state.services.by_slug("corporate").map(|s| s.title.as_str()), Some("CORPORATE"));
        assert!(state.services.by_slug("missing").is_none());
    }

    #[test]
    fn test_has_searched_resets_only_on_clear() {
        let mut state = AppState::default();
        reduce(&mut state, Action::SetQuery("zz".into()));
        assert!(!state.search.show_no_results());

        reduce(&mut state, Action::SetResults(vec![]));
        assert!(state.search.has_searched);
        assert!(state.search.show_no_results());

        reduce(&mut state, Action::SetQuery("   ".into()));
        assert!(state.search.has_searched);
        assert!(!state.search.show_no_results());

        reduce(&mut state, Action::ClearSearch);
        assert!(!state.search.has_searched);
        assert!(state.search.query.is_empty());
    }

    #[test]
    fn test_only_latest_search_clears_loading() {
        let mut state = AppState::default();
        reduce(&mut state, Action::SetQuery("ab".into()));
        reduce(&mut state, Action::SearchStarted(1));
        reduce(&mut state, Action::SetQuery("abc".into()));
        reduce(&mut state, Action::SearchStarted(2));

        let finished = |run: u64, term: &str| Action::SearchFinished {
            run,
            term: term.to_string(),
            results: vec![],
        };
        assert!(!reduce(&mut state, finished(1, "ab")));
        assert!(state.search.is_loading);
        assert!(!state.search.has_searched);

        assert!(reduce(&mut state, finished(2, "abc")));
        assert!(!state.search.is_loading);
        assert!(state.search.show_no_results());
    }

    #[test]
    fn test_stale_latest_search_still_clears_loading() {
        let mut state = AppState::default();
        reduce(&mut state, Action::SetQuery("ab".into()));
        reduce(&mut state, Action::SearchStarted(7));
        reduce(&mut state, Action::SetQuery("abc".into()));

        reduce(
            &mut state,
            Action::SearchFinished {
                run: 7,
                term: "ab".into(),
                results: vec![],
            },
        );
        assert!(!state.search.is_loading);
        assert!(!state.search.has_searched);
        assert_eq!(state.search.query, "abc");
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = Store::new();
        let mut rx = store.subscribe();
        store.dispatch(Action::SetLanguage(Locale::Ar));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().ui.language, Locale::Ar);
    }
}
