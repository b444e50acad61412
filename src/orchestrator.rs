//! Search orchestration: debounced queries fan out across categories with
//! per-category pagination.
//!
//! All state lives behind `Rc`/`RefCell` and every mutation happens on the
//! single-threaded scheduler between suspension points. Ordering *across*
//! suspension points is not guaranteed, so each fetch carries the query
//! epoch it was spawned under and a response landing after a newer submit
//! is discarded instead of applied.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::backend::{BackendError, IndexerBackend};
use crate::categories::{CATEGORIES, CategoryKind, DisplayItem};

/// Per-category cursor: accumulated pages plus fetch bookkeeping.
///
/// `results` is append-only within a query epoch, in page-arrival order.
/// `loading` is true while exactly one fetch for the category is
/// outstanding; the orchestrator never issues a second one concurrently.
#[derive(Debug, Clone, Default)]
pub struct CategoryState {
    pub results: Vec<DisplayItem>,
    pub loading: bool,
    /// Set once a page comes back short; later `load_more` calls no-op.
    pub exhausted: bool,
}

#[derive(Debug, Default)]
struct CategoryStates {
    directories: CategoryState,
    files: CategoryState,
    items: CategoryState,
}

impl CategoryStates {
    fn get(&self, kind: CategoryKind) -> &CategoryState {
        match kind {
            CategoryKind::Directories => &self.directories,
            CategoryKind::Files => &self.files,
            CategoryKind::Items => &self.items,
        }
    }

    fn get_mut(&mut self, kind: CategoryKind) -> &mut CategoryState {
        match kind {
            CategoryKind::Directories => &mut self.directories,
            CategoryKind::Files => &mut self.files,
            CategoryKind::Items => &mut self.items,
        }
    }

    fn reset(&mut self) {
        self.directories = CategoryState::default();
        self.files = CategoryState::default();
        self.items = CategoryState::default();
    }
}

struct Inner<B> {
    backend: Rc<B>,
    page_limit: usize,
    /// Current query generation; bumped on every submit, including clears.
    epoch: Cell<u64>,
    query: RefCell<String>,
    states: RefCell<CategoryStates>,
    /// Spawned-but-unfinished fetch tasks, counted at spawn time so
    /// `wait_idle` covers fetches that have not started running yet.
    inflight: Cell<usize>,
    idle: Notify,
}

/// Cheaply cloneable handle to the orchestration state.
pub struct SearchOrchestrator<B> {
    inner: Rc<Inner<B>>,
}

impl<B> Clone for SearchOrchestrator<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B: IndexerBackend + 'static> SearchOrchestrator<B> {
    pub fn new(backend: Rc<B>, page_limit: usize) -> Self {
        Self {
            inner: Rc::new(Inner {
                backend,
                page_limit,
                epoch: Cell::new(0),
                query: RefCell::new(String::new()),
                states: RefCell::new(CategoryStates::default()),
                inflight: Cell::new(0),
                idle: Notify::new(),
            }),
        }
    }

    /// Start a new search, resetting every category and issuing one
    /// offset-0 fetch per category. A blank query clears all state
    /// synchronously without fetching anything.
    ///
    /// Fetches run independently; a slow or failing category never blocks
    /// the others. Must be called from within a `LocalSet`.
    pub fn submit(&self, raw: &str) {
        let query = raw.trim().to_string();
        let epoch = self.inner.epoch.get() + 1;
        self.inner.epoch.set(epoch);
        self.inner.states.borrow_mut().reset();
        *self.inner.query.borrow_mut() = query.clone();

        if query.is_empty() {
            debug!(epoch, "search cleared");
            return;
        }

        debug!(epoch, query = %query, "search submitted");
        for descriptor in CATEGORIES {
            self.spawn_fetch(descriptor.kind, 0, epoch);
        }
    }

    /// Fetch the next page for one category. No-op while a fetch for that
    /// category is in flight, after the category is exhausted, or when no
    /// query is active.
    pub fn load_more(&self, kind: CategoryKind) {
        if self.inner.query.borrow().is_empty() {
            return;
        }
        let offset = {
            let states = self.inner.states.borrow();
            let state = states.get(kind);
            if state.loading || state.exhausted {
                return;
            }
            state.results.len()
        };
        self.spawn_fetch(kind, offset, self.inner.epoch.get());
    }

    /// Whether a `load_more` for this category would issue a fetch.
    pub fn can_load_more(&self, kind: CategoryKind) -> bool {
        if self.inner.query.borrow().is_empty() {
            return false;
        }
        let states = self.inner.states.borrow();
        let state = states.get(kind);
        !state.loading && !state.exhausted
    }

    pub fn state(&self, kind: CategoryKind) -> CategoryState {
        self.inner.states.borrow().get(kind).clone()
    }

    pub fn is_loading(&self, kind: CategoryKind) -> bool {
        self.inner.states.borrow().get(kind).loading
    }

    pub fn query(&self) -> String {
        self.inner.query.borrow().clone()
    }

    /// Resolve once no spawned fetch remains outstanding.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.inner.inflight.get() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn spawn_fetch(&self, kind: CategoryKind, offset: usize, epoch: u64) {
        self.inner.inflight.set(self.inner.inflight.get() + 1);
        let this = self.clone();
        tokio::task::spawn_local(async move {
            this.run_fetch(kind, offset, epoch).await;
            let left = this.inner.inflight.get() - 1;
            this.inner.inflight.set(left);
            if left == 0 {
                this.inner.idle.notify_waiters();
            }
        });
    }

    async fn run_fetch(&self, kind: CategoryKind, offset: usize, epoch: u64) {
        // Guard before the first await: at most one fetch per category.
        {
            if epoch != self.inner.epoch.get() {
                return;
            }
            let mut states = self.inner.states.borrow_mut();
            let state = states.get_mut(kind);
            if state.loading {
                debug!(category = %kind, offset, "fetch already in flight, skipping");
                return;
            }
            state.loading = true;
        }

        let query = self.inner.query.borrow().clone();
        let limit = self.inner.page_limit;
        let result = fetch_page(self.inner.backend.as_ref(), kind, &query, offset, limit).await;

        if epoch != self.inner.epoch.get() {
            // The state this fetch belongs to was reset by a newer submit;
            // its bookkeeping is no longer ours to touch.
            debug!(category = %kind, epoch, "discarding stale page");
            return;
        }

        let mut states = self.inner.states.borrow_mut();
        let state = states.get_mut(kind);
        match result {
            Ok(items) => {
                debug!(category = %kind, offset, count = items.len(), "page applied");
                if items.len() < limit {
                    state.exhausted = true;
                }
                state.results.extend(items);
                state.loading = false;
            }
            Err(err) => {
                // Accumulated pages stay visible; no automatic retry.
                warn!(category = %kind, offset, error = %err, "page fetch failed");
                state.loading = false;
            }
        }
    }
}

/// One remote page, transformed to display items in response order.
async fn fetch_page<B: IndexerBackend>(
    backend: &B,
    kind: CategoryKind,
    query: &str,
    offset: usize,
    limit: usize,
) -> Result<Vec<DisplayItem>, BackendError> {
    match kind {
        CategoryKind::Directories => {
            let hits = backend.search_directories(query, offset, limit).await?;
            let mut out = Vec::with_capacity(hits.len());
            for hit in hits {
                out.push(DisplayItem::from_directory(hit).await);
            }
            Ok(out)
        }
        CategoryKind::Files => {
            let hits = backend.search_files(query, offset, limit).await?;
            let mut out = Vec::with_capacity(hits.len());
            for hit in hits {
                out.push(DisplayItem::from_file(hit).await);
            }
            Ok(out)
        }
        CategoryKind::Items => {
            let hits = backend.search_items(query, offset, limit).await?;
            let mut out = Vec::with_capacity(hits.len());
            for hit in hits {
                out.push(DisplayItem::from_content(hit).await);
            }
            Ok(out)
        }
    }
}
