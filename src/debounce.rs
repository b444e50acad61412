//! Input debouncing for the search box.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Collapses bursts of input changes into one delayed submission.
///
/// Every `notify` cancels the pending timer and reschedules, so the
/// callback fires exactly once per quiet period, with the value of the
/// last call. Blank input short-circuits: the callback runs synchronously
/// with an empty query and nothing is scheduled. Dropping the debouncer
/// cancels any pending work.
pub struct QueryDebouncer {
    quiet: Duration,
    on_query: Rc<dyn Fn(&str)>,
    pending: RefCell<Option<JoinHandle<()>>>,
}

impl QueryDebouncer {
    pub fn new(quiet: Duration, on_query: impl Fn(&str) + 'static) -> Self {
        Self {
            quiet,
            on_query: Rc::new(on_query),
            pending: RefCell::new(None),
        }
    }

    /// Record an input change. Must be called from within a `LocalSet`.
    pub fn notify(&self, raw: &str) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            handle.abort();
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            (self.on_query)("");
            return;
        }

        let quiet = self.quiet;
        let on_query = Rc::clone(&self.on_query);
        let query = trimmed.to_string();
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(quiet).await;
            on_query(&query);
        });
        *self.pending.borrow_mut() = Some(handle);
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            handle.abort();
        }
    }
}
