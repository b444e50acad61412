//! Client-side tuning knobs.

use std::time::Duration;

use crate::scroll::DEFAULT_LOAD_MORE_THRESHOLD;

/// Orchestration parameters, overridable from the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Page size for every category fetch.
    pub page_limit: usize,
    /// Quiet period before a typed query is submitted.
    pub debounce: Duration,
    /// Status poll cadence.
    pub poll_interval: Duration,
    /// Remaining scroll distance below which the next page loads.
    pub scroll_threshold: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_limit: 10,
            debounce: Duration::from_millis(500),
            poll_interval: Duration::from_secs(1),
            scroll_threshold: DEFAULT_LOAD_MORE_THRESHOLD,
        }
    }
}

impl ClientConfig {
    /// Load config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(val) = dotenvy::var("DESKSEEK_PAGE_LIMIT")
            && let Ok(n) = val.parse::<usize>()
            && n > 0
        {
            cfg.page_limit = n;
        }

        if let Ok(val) = dotenvy::var("DESKSEEK_DEBOUNCE_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            cfg.debounce = Duration::from_millis(ms);
        }

        if let Ok(val) = dotenvy::var("DESKSEEK_POLL_INTERVAL_MS")
            && let Ok(ms) = val.parse::<u64>()
            && ms > 0
        {
            cfg.poll_interval = Duration::from_millis(ms);
        }

        if let Ok(val) = dotenvy::var("DESKSEEK_SCROLL_THRESHOLD")
            && let Ok(px) = val.parse::<f32>()
            && px >= 0.0
        {
            cfg.scroll_threshold = px;
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.page_limit, 10);
        assert_eq!(cfg.debounce, Duration::from_millis(500));
        assert_eq!(cfg.poll_interval, Duration::from_secs(1));
    }

    #[test]
    #[serial]
    fn env_overrides_apply() {
        unsafe {
            std::env::set_var("DESKSEEK_PAGE_LIMIT", "25");
            std::env::set_var("DESKSEEK_DEBOUNCE_MS", "120");
        }
        let cfg = ClientConfig::from_env();
        assert_eq!(cfg.page_limit, 25);
        assert_eq!(cfg.debounce, Duration::from_millis(120));
        unsafe {
            std::env::remove_var("DESKSEEK_PAGE_LIMIT");
            std::env::remove_var("DESKSEEK_DEBOUNCE_MS");
        }
    }

    #[test]
    #[serial]
    fn invalid_env_values_fall_back() {
        unsafe {
            std::env::set_var("DESKSEEK_PAGE_LIMIT", "0");
            std::env::set_var("DESKSEEK_POLL_INTERVAL_MS", "soon");
        }
        let cfg = ClientConfig::from_env();
        assert_eq!(cfg.page_limit, 10);
        assert_eq!(cfg.poll_interval, Duration::from_secs(1));
        unsafe {
            std::env::remove_var("DESKSEEK_PAGE_LIMIT");
            std::env::remove_var("DESKSEEK_POLL_INTERVAL_MS");
        }
    }
}
