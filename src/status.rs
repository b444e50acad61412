//! Background status polling.
//!
//! A detached task polls `get_status` forever at a fixed cadence and
//! republishes the derived [`IndexStatus`] through a watch channel. Poll
//! failures keep the previous snapshot and never stop the loop. The busy
//! flag is the one signal other parts of the client consume, e.g. to gate
//! index-path mutation while the backend is mid-index.

use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::{IndexerBackend, StatusSnapshot};

/// UI-facing indexing status, derived wholesale from each poll response.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct IndexStatus {
    /// True while any task is pending or running.
    pub busy: bool,
    pub pending: usize,
    pub running: usize,
    pub failed: usize,
    pub running_tasks: Vec<String>,
    pub directories: usize,
    pub files: usize,
    pub items: usize,
}

impl From<StatusSnapshot> for IndexStatus {
    fn from(snap: StatusSnapshot) -> Self {
        let tasks = snap.task_status_stat;
        let index = snap.index_status_stat;
        Self {
            busy: tasks.pending != 0 || tasks.running != 0,
            pending: tasks.pending,
            running: tasks.running,
            failed: tasks.failed,
            running_tasks: tasks.running_tasks,
            directories: index.directories,
            files: index.files,
            items: index.items,
        }
    }
}

/// Endless poll loop scoped to this handle; dropping it stops the timer.
pub struct StatusPoller {
    handle: JoinHandle<()>,
    rx: watch::Receiver<IndexStatus>,
}

impl StatusPoller {
    /// Start polling immediately, then every `interval`. Must be called
    /// from within a `LocalSet`.
    pub fn spawn<B: IndexerBackend + 'static>(backend: Rc<B>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(IndexStatus::default());
        let handle = tokio::task::spawn_local(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match backend.get_status().await {
                    Ok(snap) => {
                        let status = IndexStatus::from(snap);
                        debug!(busy = status.busy, pending = status.pending, "status updated");
                        tx.send_replace(status);
                    }
                    Err(err) => {
                        // Previous snapshot stays published; the loop goes on.
                        warn!(error = %err, "status poll failed");
                    }
                }
            }
        });
        Self { handle, rx }
    }

    /// Subscribe for change notifications.
    pub fn subscribe(&self) -> watch::Receiver<IndexStatus> {
        self.rx.clone()
    }

    /// Latest published status.
    pub fn current(&self) -> IndexStatus {
        self.rx.borrow().clone()
    }

    pub fn busy(&self) -> bool {
        self.rx.borrow().busy
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
