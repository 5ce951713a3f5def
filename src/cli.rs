//! CLI argument parsing
//!
//! Uses clap for argument parsing with derive macros. Flags override the
//! config file via [`Cli::apply_overrides`].

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::MarqueeConfig;
use crate::context::PageContext;

/// Terminal companion for watch-together servers - live discussion updates and unread notifications
#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server base URL (default: from config, else http://127.0.0.1:5000)
    #[arg(short, long, env = "MARQUEE_URL", global = true)]
    pub url: Option<String>,

    /// Session cookie value used to authenticate requests
    #[arg(long, env = "MARQUEE_SESSION", hide_env_values = true, global = true)]
    pub session: Option<String>,

    /// Route prefix of the discussion endpoints
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Config file path (default: ~/.config/marquee/config.toml)
    #[arg(long, env = "MARQUEE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Seconds between update checks
    #[arg(short, long, global = true)]
    pub interval: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Tick rate in ticks per second (default: 1.0)
    #[arg(short = 't', long, default_value_t = 1.0, global = true)]
    pub tick_rate: f64,

    /// Frame rate in frames per second (default: 30.0)
    #[arg(short = 'F', long, default_value_t = 30.0, global = true)]
    pub frame_rate: f64,
}

/// Which discussions to follow
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// Follow discussions of a content item
    #[arg(long, global = true, conflicts_with_all = ["group", "page"])]
    pub content: Option<u64>,

    /// Follow discussions of a watch group
    #[arg(long, global = true, conflicts_with = "page")]
    pub group: Option<u64>,

    /// Follow whatever a browser path points at, e.g. /discussions/group/4
    #[arg(long, global = true)]
    pub page: Option<String>,
}

impl TargetArgs {
    /// Resolve the page context, falling back to the configured ids
    pub fn resolve(&self, config: &MarqueeConfig) -> PageContext {
        if let Some(page) = &self.page {
            return PageContext::from_path(page);
        }
        match PageContext::from_ids(self.content, self.group) {
            PageContext::Other => {
                PageContext::from_ids(config.server.content_id, config.server.group_id)
            }
            context => context,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print unread notifications and exit
    Notifications {
        /// Print raw JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Check once for new discussions in the followed context
    Check {
        /// Watermark (ISO-8601); defaults to one interval ago
        #[arg(long)]
        since: Option<String>,
    },

    /// Mark notifications read
    MarkRead {
        /// Notification ids
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Print an example configuration file
    Config {
        /// Write it to the config path instead of stdout
        #[arg(long, default_value_t = false)]
        write: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Generate shell completions and print to stdout
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "marquee", &mut io::stdout());
}

/// Period of a per-second rate, `None` unless the rate is positive and finite
pub fn rate_period(rate: f64) -> Option<Duration> {
    if !(rate > 0.0 && rate.is_finite()) {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / rate).ok()
}

impl Cli {
    /// Config file path chosen by flag/env or the default location
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(MarqueeConfig::default_path)
    }

    /// Fold CLI overrides into the loaded configuration
    pub fn apply_overrides(&self, config: &mut MarqueeConfig) {
        if let Some(url) = &self.url {
            config.server.base_url = url.clone();
        }
        if let Some(session) = &self.session {
            config.server.session = Some(session.clone());
        }
        if let Some(namespace) = &self.namespace {
            config.server.namespace = namespace.clone();
        }
        if let Some(interval) = self.interval {
            config.polling.interval_secs = interval;
        }
    }
}
