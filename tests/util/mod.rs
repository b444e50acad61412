#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::collections::VecDeque;
use std::time::Duration;

use deskseek::backend::{
    BackendError, ContentHit, DirectoryHit, FileHit, IndexStatusStat, IndexerBackend,
    StatusSnapshot, TaskStatusStat,
};
use deskseek::categories::CategoryKind;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: CategoryKind,
    pub query: String,
    pub offset: usize,
    pub limit: usize,
}

/// Scripted in-process backend for orchestration tests.
///
/// Search results come from a fixed corpus filtered by substring match
/// (case-insensitive), paged by `(offset, limit)` with stable ordering.
/// Failures are injected per category; an optional delay keeps fetches in
/// flight under paused tokio time.
pub struct MockBackend {
    pub dirs: Vec<String>,
    pub files: Vec<String>,
    pub items: Vec<ContentHit>,
    pub delay: Option<Duration>,
    pub fail: RefCell<HashSet<CategoryKind>>,
    pub calls: RefCell<Vec<Call>>,
    /// Responses for successive `get_status` calls; when exhausted, an
    /// idle snapshot is returned.
    pub status_script: RefCell<VecDeque<Result<StatusSnapshot, BackendError>>>,
    pub status_calls: Cell<usize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            dirs: Vec::new(),
            files: Vec::new(),
            items: Vec::new(),
            delay: None,
            fail: RefCell::new(HashSet::new()),
            calls: RefCell::new(Vec::new()),
            status_script: RefCell::new(VecDeque::new()),
            status_calls: Cell::new(0),
        }
    }

    /// Corpus with `n` files named `/docs/<stem>-<i>.txt`.
    pub fn with_files(n: usize, stem: &str) -> Self {
        let mut backend = Self::new();
        backend.files = (0..n).map(|i| format!("/docs/{stem}-{i}.txt")).collect();
        backend
    }

    pub fn fail_category(&self, kind: CategoryKind) {
        self.fail.borrow_mut().insert(kind);
    }

    pub fn heal_category(&self, kind: CategoryKind) {
        self.fail.borrow_mut().remove(&kind);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn calls_for(&self, kind: CategoryKind) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect()
    }

    pub fn push_status(&self, snap: Result<StatusSnapshot, BackendError>) {
        self.status_script.borrow_mut().push_back(snap);
    }

    async fn pre(
        &self,
        kind: CategoryKind,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(), BackendError> {
        self.calls.borrow_mut().push(Call {
            kind,
            query: query.to_string(),
            offset,
            limit,
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.borrow().contains(&kind) {
            return Err(BackendError::Unavailable("injected failure".into()));
        }
        Ok(())
    }
}

fn page<T: Clone>(matched: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
    matched.into_iter().skip(offset).take(limit).collect()
}

fn matches(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(&query.to_lowercase())
}

impl IndexerBackend for MockBackend {
    async fn search_directories(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<DirectoryHit>, BackendError> {
        self.pre(CategoryKind::Directories, query, offset, limit)
            .await?;
        let matched: Vec<_> = self
            .dirs
            .iter()
            .filter(|p| matches(p, query))
            .cloned()
            .collect();
        Ok(page(matched, offset, limit)
            .into_iter()
            .map(|path| DirectoryHit { path })
            .collect())
    }

    async fn search_files(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<FileHit>, BackendError> {
        self.pre(CategoryKind::Files, query, offset, limit).await?;
        let matched: Vec<_> = self
            .files
            .iter()
            .filter(|p| matches(p, query))
            .cloned()
            .collect();
        Ok(page(matched, offset, limit)
            .into_iter()
            .map(|path| FileHit { path })
            .collect())
    }

    async fn search_items(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ContentHit>, BackendError> {
        self.pre(CategoryKind::Items, query, offset, limit).await?;
        let matched: Vec<_> = self
            .items
            .iter()
            .filter(|i| matches(&i.content, query))
            .cloned()
            .collect();
        Ok(page(matched, offset, limit))
    }

    async fn get_status(&self) -> Result<StatusSnapshot, BackendError> {
        self.status_calls.set(self.status_calls.get() + 1);
        match self.status_script.borrow_mut().pop_front() {
            Some(scripted) => scripted,
            None => Ok(StatusSnapshot::default()),
        }
    }

    async fn get_index_dir_paths(&self) -> Result<Vec<String>, BackendError> {
        Ok(Vec::new())
    }

    async fn add_index_path(&self, _path: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn del_index_path(&self, _path: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Build a busy/idle status snapshot for scripting.
pub fn status_snapshot(pending: usize, running: usize) -> StatusSnapshot {
    StatusSnapshot {
        task_status_stat: TaskStatusStat {
            pending,
            running,
            failed: 0,
            running_tasks: (0..running).map(|i| format!("/docs/task-{i}")).collect(),
            failed_tasks: Vec::new(),
        },
        index_status_stat: IndexStatusStat {
            directories: 3,
            files: 40,
            items: 900,
        },
    }
}
