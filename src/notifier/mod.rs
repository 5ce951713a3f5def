//! Visibility-aware polling of the server's "what's new" endpoints
//!
//! The notifier is owned by the event loop and only ever touched from it.
//! Network calls run on spawned tasks that report back through the event
//! channel, so a slow request never stalls input handling:
//!
//! ```text
//!  timer ──PollTick──▶ check_for_updates ──spawn──▶ api.recent ──RecentLoaded──▶ apply_recent
//!                      load_notifications ──spawn──▶ api.unread ──NotificationsLoaded──▶ apply_notifications
//! ```
//!
//! Overlapping requests are allowed. Every write they end in (badge, title,
//! panel) is idempotent, so a stale answer is corrected on the next tick.

mod settings;

pub use settings::{clamp_interval, PollSettings};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::api::DiscussionApi;
use crate::context::PageContext;
use crate::event::{Event, NotifierEvent, Visibility};
use crate::models::{NotificationItem, RecentDiscussion};
use crate::notify;
use crate::view::{new_discussions_message, render_notification, Alert, Surface};

/// Polling state, owned exclusively by one [`PollingNotifier`]
#[derive(Debug, Clone)]
pub struct PollState {
    /// Watermark: updates created before this were already observed
    pub last_checked_at: DateTime<Utc>,
    /// Whether the poll timer is running
    pub is_active: bool,
    /// Server-reported unread notification count
    pub unread_count: usize,
}

impl PollState {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_checked_at: now,
            is_active: false,
            unread_count: 0,
        }
    }
}

/// Keeps the badge, title, panel and alerts in step with the server
///
/// [`PollingNotifier::spawn`] builds one already `Active`, with the first
/// unread load in flight. [`PollingNotifier::new`] leaves it `Stopped` for
/// callers that drive `start` themselves.
pub struct PollingNotifier {
    api: Arc<dyn DiscussionApi>,
    context: PageContext,
    settings: PollSettings,
    state: PollState,
    visibility: Visibility,
    timer: Option<JoinHandle<()>>,
    events: mpsc::Sender<Event>,
    surface: Surface,
    terminated: bool,
}

impl PollingNotifier {
    /// Create a notifier in the `Stopped` state
    ///
    /// Call `start` to enter `Active`, or use [`PollingNotifier::spawn`].
    pub fn new(
        api: Arc<dyn DiscussionApi>,
        context: PageContext,
        settings: PollSettings,
        surface: Surface,
        events: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            api,
            context,
            settings,
            state: PollState::new(Utc::now()),
            visibility: Visibility::Visible,
            timer: None,
            events,
            surface,
            terminated: false,
        }
    }

    /// Create a notifier that is already polling
    ///
    /// The timer is running and the unread list is being fetched on return.
    pub fn spawn(
        api: Arc<dyn DiscussionApi>,
        context: PageContext,
        settings: PollSettings,
        surface: Surface,
        events: mpsc::Sender<Event>,
    ) -> Self {
        let mut notifier = Self::new(api, context, settings, surface, events);
        notifier.begin();
        notifier
    }

    /// Start-up sequence: begin polling and load the unread list once
    fn begin(&mut self) {
        tracing::info!(
            context = %self.context,
            interval_secs = self.settings.interval.as_secs(),
            "Notifier starting"
        );
        self.start();
        self.load_notifications();
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn context(&self) -> PageContext {
        self.context
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Begin the periodic refresh; no-op while already active
    pub fn start(&mut self) {
        if self.terminated || self.state.is_active {
            return;
        }

        let tx = self.events.clone();
        let period = clamp_interval(self.settings.interval);
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx
                    .send(Event::Notifier(NotifierEvent::PollTick))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        }));
        self.state.is_active = true;
        tracing::debug!("Polling started");
    }

    /// Cancel the timer if one is scheduled; safe to call repeatedly
    ///
    /// Requests already in flight are not cancelled and may still land.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            tracing::debug!("Polling stopped");
        }
        self.state.is_active = false;
    }

    /// Terminal transition on quit: stop polling and ignore everything after
    pub fn shutdown(&mut self) {
        self.stop();
        self.terminated = true;
    }

    /// React to the terminal gaining or losing focus
    pub fn set_visibility(&mut self, visibility: Visibility) {
        if self.terminated {
            return;
        }
        self.visibility = visibility;
        match visibility {
            Visibility::Hidden => self.stop(),
            Visibility::Visible => {
                self.start();
                self.mark_all_visible_as_read();
            }
        }
    }

    /// Ask the context's "recent" endpoint whether anything new was posted
    ///
    /// Skipped while hidden, in case a tick raced with a focus change.
    pub fn check_for_updates(&self) {
        if self.terminated || self.visibility == Visibility::Hidden {
            return;
        }
        if !self.context.has_endpoint() {
            return;
        }

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let context = self.context;
        let since = self.state.last_checked_at;
        let limit = self.settings.recent_limit;
        tokio::spawn(async move {
            match api.recent(context, since, limit).await {
                Ok(discussions) => {
                    let _ = tx
                        .send(Event::Notifier(NotifierEvent::RecentLoaded(discussions)))
                        .await;
                }
                Err(e) => {
                    tracing::warn!(
                        context = %context,
                        error = %e,
                        remote = e.is_remote(),
                        "Error checking for updates"
                    );
                }
            }
        });
    }

    /// Fold a "recent" answer into the watermark and alert
    ///
    /// Returns true if anything new was reported.
    pub fn apply_recent(&mut self, discussions: Vec<RecentDiscussion>, now: DateTime<Utc>) -> bool {
        if discussions.is_empty() {
            return false;
        }

        let count = discussions.len();
        self.state.last_checked_at = now;
        let message = new_discussions_message(count);
        tracing::info!(count, "New discussions available");

        if self.settings.desktop_alerts {
            notify::send("New discussions", &message);
        }
        self.surface
            .raise_alert(Alert::new(message, self.settings.alert_timeout));
        self.surface.merge_recent(discussions);
        true
    }

    /// Fetch the unread list in the background
    pub fn load_notifications(&self) {
        if self.terminated {
            return;
        }
        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        tokio::spawn(async move {
            match api.unread_notifications().await {
                Ok(items) => {
                    let _ = tx
                        .send(Event::Notifier(NotifierEvent::NotificationsLoaded(items)))
                        .await;
                }
                Err(e) => tracing::warn!(error = %e, "Error loading notifications"),
            }
        });
    }

    /// Replace the panel wholesale and reconcile the badge
    pub fn apply_notifications(&mut self, items: &[NotificationItem], now: DateTime<Utc>) {
        let views = items
            .iter()
            .take(self.settings.panel_limit)
            .map(|item| render_notification(item, now))
            .collect();
        self.surface.replace_panel(views);
        self.update_notification_badge(items.len());
    }

    /// Set the unread count, badge and decorated title
    pub fn update_notification_badge(&mut self, count: usize) {
        self.state.unread_count = count;
        self.surface.set_unread(count);
    }

    /// Optimistically mark one notification read and send the receipt
    ///
    /// Failures are logged; the row is not restored.
    pub fn mark_as_read(&mut self, notification_id: u64) {
        if self.terminated {
            return;
        }
        self.surface.mark_read(notification_id);
        self.spawn_receipt(notification_id, false);
    }

    /// Mark every rendered unread row read, one independent request each
    ///
    /// Returns how many receipts were issued. A reload is scheduled shortly
    /// after so the badge catches up with the server.
    pub fn mark_all_visible_as_read(&mut self) -> usize {
        if self.terminated {
            return 0;
        }
        let ids = self.surface.unread_ids();
        if ids.is_empty() {
            return 0;
        }

        tracing::debug!(count = ids.len(), "Marking visible notifications read");
        for &id in &ids {
            self.mark_as_read(id);
        }

        let tx = self.events.clone();
        let delay = self.settings.refresh_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx
                .send(Event::Notifier(NotifierEvent::ReloadNotifications))
                .await;
        });
        ids.len()
    }

    /// Mark a notification read, then refresh the list
    ///
    /// The caller navigates to the discussion afterwards.
    pub fn view_discussion(&mut self, notification_id: u64) {
        if self.terminated {
            return;
        }
        self.surface.mark_read(notification_id);
        self.spawn_receipt(notification_id, true);
    }

    fn spawn_receipt(&self, notification_id: u64, reload_after: bool) {
        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let ok = match api.mark_read(notification_id).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        notification_id,
                        error = %e,
                        "Error marking notification as read"
                    );
                    false
                }
            };
            let _ = tx
                .send(Event::Notifier(NotifierEvent::MarkReadFinished {
                    notification_id,
                    ok,
                }))
                .await;
            if reload_after {
                let _ = tx
                    .send(Event::Notifier(NotifierEvent::ReloadNotifications))
                    .await;
            }
        });
    }

    /// Route a completion or tick back into the notifier
    ///
    /// Returns true if the surface may have changed.
    pub fn handle(&mut self, event: NotifierEvent) -> bool {
        match event {
            NotifierEvent::PollTick => {
                self.check_for_updates();
                false
            }
            NotifierEvent::RecentLoaded(discussions) => {
                self.apply_recent(discussions, Utc::now())
            }
            NotifierEvent::NotificationsLoaded(items) => {
                self.apply_notifications(&items, Utc::now());
                true
            }
            NotifierEvent::MarkReadFinished {
                notification_id,
                ok,
            } => {
                tracing::trace!(notification_id, ok, "Read receipt finished");
                false
            }
            NotifierEvent::ReloadNotifications => {
                self.load_notifications();
                false
            }
        }
    }
}

impl Drop for PollingNotifier {
    fn drop(&mut self) {
        self.stop();
    }
}
