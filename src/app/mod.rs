//! Application state and logic
//!
//! This module contains the main `App` struct. Keyboard handling, link
//! navigation and reactions live in sub-modules.
//!
//! The app owns the [`PollingNotifier`] and is the only thing that touches
//! it: every background completion arrives as an [`Event`] through
//! [`App::handle_event`], so the notifier never needs a lock.

mod keyboard;
mod navigation;
mod operations;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use url::Url;

use crate::api::DiscussionApi;
use crate::event::Event;
use crate::notifier::PollingNotifier;
use crate::reaction;

/// Status messages clear after this long
const STATUS_TTL: Duration = Duration::from_secs(5);

/// Which list has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Notifications,
    Discussions,
}

/// Application state and logic
pub struct App {
    pub notifier: PollingNotifier,
    pub should_quit: bool,
    pub show_help: bool,
    /// Dirty flag: true if UI needs re-render (render-on-change optimization)
    pub needs_render: bool,
    /// List with keyboard focus
    pub pane: Pane,
    /// Cursor in the notification panel
    pub selected_notification: usize,
    /// Cursor in the recent discussions list
    pub selected_discussion: usize,
    /// Status message to display in footer (message, timestamp)
    pub status_message: Option<(String, Instant)>,
    /// Server base URL, for building links
    pub base: Url,
    /// Route prefix of the discussion endpoints
    pub namespace: String,
    /// Command that opens links; `None` uses the platform opener
    pub browser: Option<String>,
    api: Arc<dyn DiscussionApi>,
    event_tx: mpsc::Sender<Event>,
    /// Mirror the decorated title into the terminal window title
    sync_title: bool,
    /// Last title written to the terminal
    applied_title: Option<String>,
}

impl App {
    pub fn new(
        notifier: PollingNotifier,
        api: Arc<dyn DiscussionApi>,
        event_tx: mpsc::Sender<Event>,
        base: Url,
        namespace: &str,
        sync_title: bool,
    ) -> Self {
        Self {
            notifier,
            should_quit: false,
            show_help: false,
            needs_render: true, // Always render first frame
            pane: Pane::Notifications,
            selected_notification: 0,
            selected_discussion: 0,
            status_message: None,
            base,
            namespace: namespace.trim_matches('/').to_string(),
            browser: None,
            api,
            event_tx,
            sync_title,
            applied_title: None,
        }
    }

    /// Show a status message in the footer (clears after 5 seconds)
    pub fn show_status(&mut self, msg: &str) {
        self.status_message = Some((msg.to_string(), Instant::now()));
        self.needs_render = true;
    }

    /// Handle incoming events
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                self.handle_key(key);
                self.needs_render = true;
            }
            Event::Focus(visibility) => {
                tracing::debug!(?visibility, "Terminal focus changed");
                self.notifier.set_visibility(visibility);
                self.needs_render = true;
            }
            Event::Notifier(event) => {
                let changed = self.notifier.handle(event);
                if changed {
                    self.clamp_selection();
                }
                self.needs_render = self.needs_render || changed;
            }
            Event::Reaction {
                discussion_id,
                action,
                response,
            } => {
                if response.success
                    && self
                        .notifier
                        .surface_mut()
                        .apply_reaction(discussion_id, &response)
                {
                    self.show_status(reaction::feedback(action));
                }
            }
        }
    }

    /// Timer housekeeping: alert expiry, status expiry, window title
    pub fn tick(&mut self) {
        if self.notifier.surface_mut().expire_alert() {
            self.needs_render = true;
        }

        if self
            .status_message
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= STATUS_TTL)
        {
            self.status_message = None;
            self.needs_render = true;
        }

        self.sync_window_title();
    }

    /// Called after render to reset dirty flag
    pub fn rendered(&mut self) {
        self.needs_render = false;
    }

    /// Quit: stop polling for good
    pub fn quit(&mut self) {
        self.should_quit = true;
        self.notifier.shutdown();
    }

    fn sync_window_title(&mut self) {
        if !self.sync_title {
            return;
        }
        let title = self.notifier.surface().title();
        if self.applied_title.as_deref() == Some(title) {
            return;
        }
        match crate::tui::set_title(title) {
            Ok(()) => self.applied_title = Some(title.to_string()),
            Err(e) => {
                tracing::debug!(error = %e, "Failed to set terminal title");
                self.sync_title = false;
            }
        }
    }

    fn clamp_selection(&mut self) {
        let rows = self.notifier.surface().panel().map_or(0, <[_]>::len);
        self.selected_notification = self.selected_notification.min(rows.saturating_sub(1));
        let recent = self.notifier.surface().recent().len();
        self.selected_discussion = self.selected_discussion.min(recent.saturating_sub(1));
    }
}

#[cfg(test)]
pub(crate) mod tests;
