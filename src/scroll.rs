//! Scroll-driven pagination trigger.

use crate::backend::IndexerBackend;
use crate::categories::CategoryKind;
use crate::orchestrator::SearchOrchestrator;

/// Remaining unscrolled distance below which the next page is requested.
pub const DEFAULT_LOAD_MORE_THRESHOLD: f32 = 20.0;

/// Viewport scroll position for one category list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f32,
    pub viewport_height: f32,
    pub content_height: f32,
}

impl ScrollMetrics {
    /// Distance left to scroll before the content ends.
    pub fn remaining(&self) -> f32 {
        (self.content_height - self.scroll_top - self.viewport_height).max(0.0)
    }
}

/// Watches per-category scroll positions and requests the next page when a
/// list nears its end. Idempotent under rapid repeated events: the
/// orchestrator's loading guard absorbs duplicates.
#[derive(Debug, Clone, Copy)]
pub struct ScrollTrigger {
    threshold: f32,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOAD_MORE_THRESHOLD,
        }
    }
}

impl ScrollTrigger {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Whether this scroll position is close enough to the end to load more.
    pub fn near_end(&self, metrics: ScrollMetrics) -> bool {
        metrics.remaining() < self.threshold
    }

    /// Handle a scroll event for one category. Returns true when a fetch
    /// was requested.
    pub fn on_scroll<B: IndexerBackend + 'static>(
        &self,
        search: &SearchOrchestrator<B>,
        kind: CategoryKind,
        metrics: ScrollMetrics,
    ) -> bool {
        if !self.near_end(metrics) || !search.can_load_more(kind) {
            return false;
        }
        search.load_more(kind);
        true
    }
}
