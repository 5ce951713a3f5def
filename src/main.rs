// Clippy configuration: enable pedantic but allow overly strict lints
#![allow(clippy::missing_errors_doc)] // Internal functions don't need # Errors docs
#![allow(clippy::missing_panics_doc)] // Internal functions don't need # Panics docs
#![allow(clippy::must_use_candidate)] // Not all getters need #[must_use]
#![allow(clippy::module_name_repetitions)] // e.g., MarqueeConfig in config module is fine
#![allow(clippy::doc_markdown)] // Don't require backticks around JSON, ISO-8601, etc.
#![allow(clippy::too_many_lines)] // Some functions are naturally long
#![allow(clippy::struct_excessive_bools)] // Config structs can have multiple bool fields
#![allow(clippy::cast_possible_truncation)] // We're careful with our casts
#![allow(clippy::cast_sign_loss)] // Timestamp conversions are safe
#![allow(clippy::cast_precision_loss)] // Duration to f64 precision loss is acceptable
#![allow(clippy::redundant_closure_for_method_calls)] // Sometimes closures are clearer
#![allow(clippy::match_same_arms)] // Explicit arms are clearer than combined patterns
#![allow(clippy::single_match_else)] // match with else is fine for Result handling
#![allow(clippy::option_if_let_else)] // if-let is more readable for Option handling
#![allow(clippy::needless_pass_by_value)] // PathBuf by value is fine for config loading

//! Marquee - terminal companion for watch-together servers
//!
//! Follows the discussion of a content item or watch group, raises an alert
//! when new discussions land, and keeps the unread-notification badge and
//! panel current. Polling pauses while the terminal is unfocused.
//!
//! Usage:
//!   marquee --content 12          # TUI following content #12
//!   marquee notifications         # Print unread notifications
//!   marquee check --group 4       # One-shot check for new discussions

mod api;
mod app;
mod cli;
mod config;
mod context;
mod errors;
mod event;
mod models;
mod notifier;
mod notify;
mod reaction;
#[cfg(test)]
mod testing;
mod tui;
mod ui;
mod view;

use api::{DiscussionApi, HttpApi};
use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use config::MarqueeConfig;
use context::PageContext;
use notifier::{clamp_interval, PollSettings, PollingNotifier};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Get the log directory path
fn get_log_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from("/tmp/marquee/logs"),
        |dirs| dirs.cache_dir().join("marquee").join("logs"),
    )
}

/// Print unread notifications as a table or raw JSON
async fn handle_notifications(api: &HttpApi, json: bool) -> Result<()> {
    let items = api.unread_notifications().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No new notifications");
        return Ok(());
    }

    let now = chrono::Utc::now();
    println!("{} unread", view::badge_text(items.len()).unwrap_or_default());
    for item in &items {
        let row = view::render_notification(item, now);
        println!(
            "{:>6}  {:<20} {:<50} {}",
            row.id,
            ui::truncate(&row.headline, 20),
            ui::truncate(&row.message, 50),
            row.age
        );
    }
    Ok(())
}

/// One-shot check for new discussions since a watermark
async fn handle_check(
    api: &HttpApi,
    context: PageContext,
    since: Option<String>,
    config: &MarqueeConfig,
) -> Result<()> {
    if !context.has_endpoint() {
        bail!("No discussion context to check. Pass --content, --group or --page");
    }

    let since = match since {
        Some(raw) => models::parse_timestamp(&raw)
            .ok_or_else(|| eyre!("Invalid --since timestamp: {raw}"))?,
        None => {
            let interval = clamp_interval(Duration::from_secs(config.polling.interval_secs));
            chrono::Utc::now() - chrono::Duration::from_std(interval)?
        }
    };

    let discussions = api
        .recent(context, since, config.polling.recent_limit)
        .await?;

    if discussions.is_empty() {
        println!("No new discussions in {context} since {}", api::format_since(since));
        return Ok(());
    }

    println!("{}", view::new_discussions_message(discussions.len()));
    for discussion in &discussions {
        println!(
            "  {}  {}",
            api::thread_url(api.base(), &config.server.namespace, discussion.id),
            discussion.summary()
        );
    }
    Ok(())
}

/// Mark notifications read, reporting each failure and continuing
async fn handle_mark_read(api: &HttpApi, ids: &[u64]) -> Result<()> {
    let mut failed = 0usize;
    for &id in ids {
        match api.mark_read(id).await {
            Ok(()) => println!("Marked {id} read"),
            Err(e) => {
                eprintln!("Failed to mark {id} read: {e}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} notifications could not be marked read", ids.len());
    }
    Ok(())
}

/// Print the example config or write the effective one to disk
fn handle_config(path: &std::path::Path, write: bool, config: &MarqueeConfig) -> Result<()> {
    if write {
        config.save_to(path)?;
        println!("Wrote configuration to {}", path.display());
    } else {
        print!("{}", MarqueeConfig::example());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    // Initialize error handling
    color_eyre::install()?;

    // Setup file logging with rotation
    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "marquee.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let log_filter = format!("marquee={}", cli.log_level);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(non_blocking),
        )
        .init();

    tracing::info!("Starting marquee v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log directory: {:?}", log_dir);

    let config_path = cli.config_path();
    let mut config = MarqueeConfig::load_from_path(config_path.clone());
    cli.apply_overrides(&mut config);
    let context = cli.target.resolve(&config);

    let api = HttpApi::new(
        &config.server.base_url,
        &config.server.namespace,
        config.server.session.as_deref(),
        Duration::from_secs(config.server.request_timeout_secs.max(1)),
    )?;
    tracing::debug!(base = %api.base(), %context, "Resolved server");

    match cli.command {
        Some(Commands::Notifications { json }) => handle_notifications(&api, json).await,
        Some(Commands::Check { since }) => handle_check(&api, context, since, &config).await,
        Some(Commands::MarkRead { ids }) => handle_mark_read(&api, &ids).await,
        Some(Commands::Config { write }) => handle_config(&config_path, write, &config),
        Some(Commands::Completions { .. }) => Ok(()),
        None => run_tui(api, context, &config, cli.tick_rate, cli.frame_rate).await,
    }
}

async fn run_tui(
    api: HttpApi,
    context: PageContext,
    config: &MarqueeConfig,
    tick_rate: f64,
    frame_rate: f64,
) -> Result<()> {
    use std::time::Instant;
    use tokio_util::sync::CancellationToken;

    // Calculate durations from rates
    let (Some(tick_duration), Some(frame_duration)) =
        (cli::rate_period(tick_rate), cli::rate_period(frame_rate))
    else {
        bail!("--tick-rate and --frame-rate must be positive finite numbers");
    };

    tracing::info!(
        "TUI starting: {:.1} FPS, {:.1} ticks/sec, following {}",
        frame_rate,
        tick_rate,
        context
    );

    let (event_tx, mut event_rx) = mpsc::channel(100);

    let base = api.base().clone();
    let api: Arc<dyn DiscussionApi> = Arc::new(api);
    let surface = view::Surface::new(
        config::BASE_TITLE,
        config.display.show_badge,
        config.display.show_panel,
    );

    // Initialize terminal (raw mode, alternate screen, focus reporting)
    let mut terminal = tui::init()?;

    // RAII guard ensures terminal is restored on panic or early return
    let _guard = tui::TerminalGuard;

    let notifier = PollingNotifier::spawn(
        Arc::clone(&api),
        context,
        PollSettings::from_config(&config.polling, &config.display),
        surface,
        event_tx.clone(),
    );
    let mut app = App::new(
        notifier,
        api,
        event_tx.clone(),
        base,
        &config.server.namespace,
        config.display.set_terminal_title,
    );
    app.browser = config.display.browser.clone();

    // Create cancellation token for graceful shutdown
    let cancel = CancellationToken::new();

    // Spawn input event handler with cancellation support
    let input_tx = event_tx.clone();
    let input_cancel = cancel.clone();
    let input_handle = tokio::spawn(async move {
        event::input::listen(input_tx, input_cancel).await;
    });

    // Frame rate limiting state
    let mut last_frame = Instant::now();

    // Main loop
    loop {
        // Frame rate limiting with dirty flag check
        let now = Instant::now();
        if app.needs_render && now.duration_since(last_frame) >= frame_duration {
            terminal.draw(|f| ui::render(f, &app))?;
            app.rendered();
            last_frame = now;
        }

        tokio::select! {
            Some(event) = event_rx.recv() => {
                app.handle_event(event);
            }
            () = tokio::time::sleep(tick_duration) => {
                app.tick();
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Teardown: stop the poll timer before the terminal goes away
    app.quit();
    tracing::debug!("Shutting down input listener");
    cancel.cancel();
    input_handle.abort();

    tui::restore()?;
    terminal.show_cursor()?;

    Ok(())
}
