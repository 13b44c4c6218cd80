//! Single owner of the search view model. Display layers read snapshots and
//! dispatch intents; every response is reconciled here under one lock.

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use shared::{
    domain::{College, HubRequirement, SortKey},
    protocol::CourseSummary,
};
use tokio::{
    sync::{broadcast, Mutex},
    time::timeout,
};
use tracing::{debug, info, warn};

use crate::{
    api::{CatalogApi, CoursePage},
    config::Settings,
    error::{FacetError, SearchError},
    facets::{FacetSnapshot, FacetStore},
    mode::{SearchMode, SearchModeController},
    pagination::{PageRequest, PageState, PageWindow, PaginationController, PaginationLayout},
    query::{DirectQuery, SearchQuery},
};

const NO_RESULTS_LABEL: &str = "No courses found. Try adjusting the filter parameters.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchViewModel {
    /// Mode of the request that produced `results`.
    pub mode: SearchMode,
    pub results: Vec<CourseSummary>,
    pub page: PageState,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: SearchPhase,
    /// The query that produced `results`.
    pub query: Option<SearchQuery>,
}

impl SearchViewModel {
    fn new(page_size: u32) -> Self {
        Self {
            mode: SearchMode::default(),
            results: Vec::new(),
            page: PageState::empty(page_size),
            loading: false,
            error: None,
            phase: SearchPhase::Idle,
            query: None,
        }
    }

    /// Summary line above the result grid; `None` until a search has landed.
    pub fn results_label(&self) -> Option<String> {
        let query = self.query.as_ref()?;
        if self.page.total_elements == 0 {
            return Some(NO_RESULTS_LABEL.to_string());
        }
        let total = self.page.total_elements;
        Some(match query {
            SearchQuery::Direct(text) => {
                format!("Found {total} course(s) matching \"{}\"", text.as_str())
            }
            SearchQuery::Faceted(_) => format!("Found {total} courses"),
        })
    }

    pub fn has_pagination_controls(&self) -> bool {
        self.page.has_controls()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SearchEvent {
    ViewModelUpdated(SearchViewModel),
    DepartmentsUpdated {
        college: College,
        departments: Vec<String>,
        error: Option<String>,
    },
}

/// How an intent ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response replaced the displayed results.
    Committed,
    /// The request failed; the error is on the view model.
    Failed(SearchError),
    /// A newer request (or a reset) made this response irrelevant.
    Superseded,
    /// Rejected before any request was issued.
    Rejected(SearchError),
    /// Nothing to do.
    NoChange,
}

struct OrchestratorState {
    facets: FacetStore,
    modes: SearchModeController,
    pagination: PaginationController,
    view: SearchViewModel,
}

pub struct SearchOrchestrator {
    api: Arc<dyn CatalogApi>,
    page_size: u32,
    request_timeout: Duration,
    layout: PaginationLayout,
    inner: Mutex<OrchestratorState>,
    events: broadcast::Sender<SearchEvent>,
}

impl SearchOrchestrator {
    pub fn new(api: Arc<dyn CatalogApi>, settings: &Settings) -> Arc<Self> {
        let page_size = settings.page_size.max(1);
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            page_size,
            request_timeout: settings.request_timeout,
            layout: settings.pagination_layout,
            inner: Mutex::new(OrchestratorState {
                facets: FacetStore::new(),
                modes: SearchModeController::new(),
                pagination: PaginationController::new(page_size),
                view: SearchViewModel::new(page_size),
            }),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    pub async fn view_model(&self) -> SearchViewModel {
        self.inner.lock().await.view.clone()
    }

    pub async fn facets(&self) -> FacetSnapshot {
        self.inner.lock().await.facets.snapshot()
    }

    pub async fn current_mode(&self) -> SearchMode {
        self.inner.lock().await.modes.current_mode()
    }

    pub async fn results_label(&self) -> Option<String> {
        self.inner.lock().await.view.results_label()
    }

    pub async fn page_window(&self) -> PageWindow {
        self.inner.lock().await.view.page.window(self.layout)
    }

    /// First faceted search with an empty selection.
    pub async fn load_initial(&self) -> SearchOutcome {
        self.submit_faceted().await
    }

    pub async fn submit_faceted(&self) -> SearchOutcome {
        let selection = self.inner.lock().await.facets.selection().clone();
        self.run_search(SearchQuery::Faceted(selection), 0).await
    }

    pub async fn submit_direct(&self, text: &str) -> SearchOutcome {
        match DirectQuery::parse(text) {
            Ok(query) => self.run_search(SearchQuery::Direct(query), 0).await,
            Err(err) => {
                debug!("rejecting direct search: {err}");
                let mut state = self.inner.lock().await;
                state.view.error = Some(err.user_message());
                self.publish(&state.view);
                SearchOutcome::Rejected(err)
            }
        }
    }

    /// Re-issues the displayed query at page `n`.
    pub async fn request_page(&self, n: i64) -> SearchOutcome {
        let (query, page) = {
            let state = self.inner.lock().await;
            match state.pagination.request_page(n) {
                PageRequest::Fetch(page) => match state.modes.active_query_descriptor() {
                    Some(query) => (query.clone(), page),
                    None => return SearchOutcome::NoChange,
                },
                PageRequest::AlreadyShown => return SearchOutcome::NoChange,
                PageRequest::OutOfRange => {
                    debug!(
                        requested = n,
                        total_pages = state.pagination.state().total_pages,
                        "ignoring out-of-range page request"
                    );
                    return SearchOutcome::NoChange;
                }
            }
        };
        self.run_search(query, page).await
    }

    /// Leaves direct mode and shows faceted results for the current facets.
    /// Retries the switch if an earlier attempt left direct results on screen.
    pub async fn clear_direct(&self) -> SearchOutcome {
        let already_faceted = {
            let state = self.inner.lock().await;
            state.modes.current_mode() == SearchMode::Faceted
                && state.view.mode == SearchMode::Faceted
        };
        if already_faceted {
            return SearchOutcome::NoChange;
        }
        self.submit_faceted().await
    }

    pub async fn set_sort_key(&self, key: Option<SortKey>) -> SearchOutcome {
        let faceted = {
            let mut state = self.inner.lock().await;
            state.facets.set_sort_key(key);
            state.modes.current_mode() == SearchMode::Faceted
        };
        if faceted {
            self.submit_faceted().await
        } else {
            SearchOutcome::NoChange
        }
    }

    /// Clears every facet, orphans outstanding requests of both modes and
    /// shows the unfiltered first page.
    pub async fn reset_filters(&self) -> SearchOutcome {
        {
            let mut state = self.inner.lock().await;
            state.facets.reset();
            state.modes.invalidate();
        }
        info!("search filters reset");
        self.submit_faceted().await
    }

    /// Selects the college and waits for its department list.
    pub async fn set_college(&self, college: Option<College>) -> FacetSnapshot {
        let lookup = self.inner.lock().await.facets.set_college(college);
        let Some(lookup) = lookup else {
            return self.facets().await;
        };

        let result = match timeout(
            self.request_timeout,
            self.api.departments_by_college(lookup.college),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(self.request_timeout)),
        };

        let mut state = self.inner.lock().await;
        if state.facets.apply_departments(lookup, result) {
            let _ = self.events.send(SearchEvent::DepartmentsUpdated {
                college: lookup.college,
                departments: state.facets.departments().to_vec(),
                error: state.facets.department_error().map(str::to_string),
            });
        }
        state.facets.snapshot()
    }

    pub async fn set_department(&self, department: Option<&str>) -> Result<(), FacetError> {
        self.inner.lock().await.facets.set_department(department)
    }

    pub async fn toggle_hub_requirement(&self, code: HubRequirement) -> bool {
        self.inner.lock().await.facets.toggle_hub_requirement(code)
    }

    pub async fn set_no_prerequisites_only(&self, enabled: bool) {
        self.inner
            .lock()
            .await
            .facets
            .set_no_prerequisites_only(enabled);
    }

    pub async fn set_minimum_rating(&self, rating: f64) {
        self.inner.lock().await.facets.set_minimum_rating(rating);
    }

    /// Applies several facet edits at once; nothing is searched until a
    /// submit intent.
    pub async fn update_facets<R>(&self, edit: impl FnOnce(&mut FacetStore) -> R) -> R {
        edit(&mut self.inner.lock().await.facets)
    }

    fn publish(&self, view: &SearchViewModel) {
        let _ = self.events.send(SearchEvent::ViewModelUpdated(view.clone()));
    }

    async fn fetch(&self, query: &SearchQuery, page: u32) -> Result<CoursePage, SearchError> {
        let params = query.build(page, self.page_size);
        debug!(mode = %query.mode(), query = %params, "issuing catalog search");
        let request = async {
            match query {
                SearchQuery::Faceted(_) => self.api.search_courses(&params).await,
                SearchQuery::Direct(_) => self.api.query_courses(&params).await,
            }
        };
        match timeout(self.request_timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(self.request_timeout)),
        }
    }

    async fn run_search(&self, query: SearchQuery, page: u32) -> SearchOutcome {
        let mode = query.mode();
        let tag = {
            let mut state = self.inner.lock().await;
            let tag = state.modes.begin(mode);
            let view = &mut state.view;
            view.loading = true;
            view.error = None;
            view.phase = SearchPhase::Loading;
            self.publish(&state.view);
            tag
        };

        let result = self.fetch(&query, page).await;

        let mut state = self.inner.lock().await;
        if !state.modes.is_current(tag) {
            debug!(mode = %tag.mode, seq = tag.seq, "discarding stale catalog response");
            return SearchOutcome::Superseded;
        }

        let outcome = match result {
            Ok(envelope) => {
                state.pagination.apply_response(
                    envelope.total_elements,
                    envelope.total_pages,
                    envelope.number,
                    envelope.size,
                );
                state.modes.commit(tag, query.clone());
                let page = state.pagination.state();
                info!(
                    mode = %mode,
                    page = page.page_index,
                    total_elements = page.total_elements,
                    "search results updated"
                );
                let view = &mut state.view;
                view.mode = mode;
                view.results = envelope.content;
                view.page = page;
                view.query = Some(query);
                view.phase = SearchPhase::Success;
                SearchOutcome::Committed
            }
            Err(err) => {
                warn!(mode = %mode, "catalog search failed: {err}");
                state.view.error = Some(err.user_message());
                state.view.phase = SearchPhase::Error;
                SearchOutcome::Failed(err)
            }
        };
        state.view.loading = false;
        self.publish(&state.view);
        outcome
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
