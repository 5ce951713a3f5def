use std::time::Duration;

use crate::config::{DisplayConfig, PollingConfig};

/// Shortest period between update checks; tokio's interval rejects zero
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Longest period between update checks
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Timing and sizing knobs for the poller
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Time between update checks
    pub interval: Duration,
    /// `limit` passed to the recent endpoint
    pub recent_limit: usize,
    /// Rows kept in the notification panel
    pub panel_limit: usize,
    /// How long the new-discussions alert stays up
    pub alert_timeout: Duration,
    /// Delay before reloading after a mark-all sweep
    pub refresh_delay: Duration,
    /// Mirror new-discussion alerts as desktop notifications
    pub desktop_alerts: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::from_config(&PollingConfig::default(), &DisplayConfig::default())
    }
}

impl PollSettings {
    pub fn from_config(polling: &PollingConfig, display: &DisplayConfig) -> Self {
        Self {
            interval: clamp_interval(Duration::from_secs(polling.interval_secs)),
            recent_limit: polling.recent_limit,
            panel_limit: polling.panel_limit,
            alert_timeout: Duration::from_secs(polling.alert_timeout_secs),
            refresh_delay: Duration::from_millis(polling.refresh_delay_ms),
            desktop_alerts: display.desktop_notifications,
        }
    }
}

/// Keep a poll period inside `MIN_INTERVAL..=MAX_INTERVAL`
pub fn clamp_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_INTERVAL, MAX_INTERVAL)
}
