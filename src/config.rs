use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{MarqueeError, Result};

/// Window title before any unread decoration
pub const BASE_TITLE: &str = "Marquee";

/// Application configuration loaded from file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MarqueeConfig {
    /// Server connection settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Polling cadence and limits
    #[serde(default)]
    pub polling: PollingConfig,

    /// Which affordances are shown
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Server connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the watch-together server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Route prefix of the discussion endpoints
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Session cookie value (prefer MARQUEE_SESSION over storing it here)
    ///
    /// Read from the file but never written back by `save_to`.
    #[serde(default, skip_serializing)]
    pub session: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Content item to follow when no CLI context is given
    #[serde(default)]
    pub content_id: Option<u64>,

    /// Group to follow when no CLI context is given
    #[serde(default)]
    pub group_id: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            namespace: default_namespace(),
            session: None,
            request_timeout_secs: default_request_timeout(),
            content_id: None,
            group_id: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_namespace() -> String {
    "discussions".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

/// Polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between update checks
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Maximum discussions requested per check
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Notifications shown in the panel
    #[serde(default = "default_panel_limit")]
    pub panel_limit: usize,

    /// Seconds before the new-discussions alert dismisses itself
    #[serde(default = "default_alert_timeout")]
    pub alert_timeout_secs: u64,

    /// Milliseconds to wait before reloading after marking everything read
    #[serde(default = "default_refresh_delay")]
    pub refresh_delay_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            recent_limit: default_recent_limit(),
            panel_limit: default_panel_limit(),
            alert_timeout_secs: default_alert_timeout(),
            refresh_delay_ms: default_refresh_delay(),
        }
    }
}

fn default_interval() -> u64 {
    30
}

fn default_recent_limit() -> usize {
    5
}

fn default_panel_limit() -> usize {
    10
}

fn default_alert_timeout() -> u64 {
    10
}

fn default_refresh_delay() -> u64 {
    1000
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show the unread badge in the header
    #[serde(default = "default_true")]
    pub show_badge: bool,

    /// Show the notification panel
    #[serde(default = "default_true")]
    pub show_panel: bool,

    /// Write the unread count into the terminal window title
    #[serde(default = "default_true")]
    pub set_terminal_title: bool,

    /// Mirror new-discussion alerts as desktop notifications
    #[serde(default)]
    pub desktop_notifications: bool,

    /// Command used to open thread links (default: the system opener)
    #[serde(default)]
    pub browser: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_badge: true,
            show_panel: true,
            set_terminal_title: true,
            desktop_notifications: false,
            browser: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl MarqueeConfig {
    /// Get the default configuration path
    pub fn default_path() -> PathBuf {
        directories::BaseDirs::new().map_or_else(
            || PathBuf::from("~/.config/marquee/config.toml"),
            |dirs| dirs.config_dir().join("marquee").join("config.toml"),
        )
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: PathBuf) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| MarqueeError::Config(e.to_string()))?;

        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Generate example configuration file content
    pub fn example() -> String {
        r#"# Marquee Configuration
# Place this file at ~/.config/marquee/config.toml

[server]
# Watch-together server to follow
base_url = "http://127.0.0.1:5000"

# Route prefix of the discussion endpoints
namespace = "discussions"

# Per-request timeout in seconds
request_timeout_secs = 10

# Follow one content item's discussions (or use group_id for a group)
# content_id = 12

[polling]
# Seconds between update checks
interval_secs = 30

# Maximum discussions requested per check
recent_limit = 5

# Notifications shown in the panel
panel_limit = 10

# Seconds before the new-discussions alert dismisses itself
alert_timeout_secs = 10

# Delay before reloading after marking everything read
refresh_delay_ms = 1000

[display]
show_badge = true
show_panel = true
set_terminal_title = true
desktop_notifications = false

# Command used to open thread links (default: the system opener)
# browser = "firefox"
"#
        .to_string()
    }
}

/// Tokyo Night color palette
pub mod colors {
    use super::Color;

    pub const BG: Color = Color::Rgb(26, 27, 38); // #1a1b26
    pub const BG_LIGHT: Color = Color::Rgb(41, 46, 66); // #292e42 lighter bg
    pub const FG: Color = Color::Rgb(192, 202, 245); // #c0caf5
    pub const ACCENT: Color = Color::Rgb(122, 162, 247); // #7aa2f7 blue
    pub const ALERT: Color = Color::Rgb(255, 158, 100); // #ff9e64 orange
    pub const MUTED: Color = Color::Rgb(86, 95, 137); // #565f89 gray
    pub const LIKE: Color = Color::Rgb(158, 206, 106); // #9ece6a green
    pub const DISLIKE: Color = Color::Rgb(247, 118, 142); // #f7768e red
    pub const BORDER: Color = Color::Rgb(59, 66, 97); // #3b4261
    pub const HIGHLIGHT: Color = Color::Rgb(187, 154, 247); // #bb9af7 purple
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MarqueeConfig::load_from_path(dir.path().join("nope.toml"));
        assert_eq!(config.polling.interval_secs, 30);
        assert_eq!(config.polling.panel_limit, 10);
        assert_eq!(config.server.namespace, "discussions");
        assert!(config.display.show_badge);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[polling]\ninterval_secs = 5\n\n[display]\nshow_panel = false\n")
            .unwrap();

        let config = MarqueeConfig::load_from_path(path);
        assert_eq!(config.polling.interval_secs, 5);
        assert_eq!(config.polling.recent_limit, 5);
        assert!(!config.display.show_panel);
        assert!(config.display.set_terminal_title);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[polling\ninterval_secs = ").unwrap();

        let config = MarqueeConfig::load_from_path(path);
        assert_eq!(config.polling.interval_secs, 30);
    }

    #[test]
    fn test_example_parses() {
        let config: MarqueeConfig = toml::from_str(&MarqueeConfig::example()).unwrap();
        assert_eq!(config.server.request_timeout_secs, 10);
        assert!(!config.display.desktop_notifications);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = MarqueeConfig::default();
        config.server.group_id = Some(4);
        config.save_to(&path).unwrap();

        let loaded = MarqueeConfig::load_from_path(path);
        assert_eq!(loaded.server.group_id, Some(4));
    }

    #[test]
    fn test_save_never_writes_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = MarqueeConfig::default();
        config.server.session = Some("s3cr3t-cookie".to_string());
        config.save_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("session"));
        assert!(!written.contains("s3cr3t-cookie"));
        assert_eq!(MarqueeConfig::load_from_path(path).server.session, None);
    }

    #[test]
    fn test_session_is_still_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nsession = \"abc\"\n").unwrap();

        let config = MarqueeConfig::load_from_path(path);
        assert_eq!(config.server.session.as_deref(), Some("abc"));
    }
}
