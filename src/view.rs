//! Pure view model for notification affordances
//!
//! Everything here is plain data: the TUI draws a [`Surface`], tests inspect
//! it directly. The badge and the notification panel are optional, and every
//! operation against a missing one is a silent no-op.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::models::{NotificationItem, ReactionResponse, RecentDiscussion};

/// Badge counts above this are displayed as `99+`
pub const BADGE_CAP: usize = 99;

/// Maximum recent discussions kept for display
pub const MAX_RECENT: usize = 20;

const DEFAULT_AVATAR: &str = "/static/images/default_avatar.svg";
const AVATAR_DIR: &str = "/static/uploads/profile_pics";

/// A rendered notification row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub id: u64,
    pub headline: String,
    pub message: String,
    pub age: String,
    pub avatar: String,
    pub discussion_id: Option<u64>,
    pub unread: bool,
}

/// Render one notification without touching any terminal state
pub fn render_notification(item: &NotificationItem, now: DateTime<Utc>) -> NotificationView {
    let avatar = item
        .trigger_user
        .profile_picture
        .as_deref()
        .filter(|p| !p.is_empty())
        .map_or_else(|| DEFAULT_AVATAR.to_string(), |p| format!("{AVATAR_DIR}/{p}"));

    NotificationView {
        id: item.id,
        headline: item.trigger_user.display_name().to_string(),
        message: item.message.trim().to_string(),
        age: time_ago(item.created_at, now),
        avatar,
        discussion_id: item.discussion_id,
        unread: !item.is_read,
    }
}

/// Human-friendly relative age
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 2_592_000 => format!("{}d ago", s / 86_400),
        _ => then.format("%Y-%m-%d").to_string(),
    }
}

/// Text shown in the badge, `None` when the badge should be hidden
pub fn badge_text(count: usize) -> Option<String> {
    match count {
        0 => None,
        c if c > BADGE_CAP => Some(format!("{BADGE_CAP}+")),
        c => Some(c.to_string()),
    }
}

/// Strip one leading `(<digits>) ` counter from a title
pub fn strip_title_count(title: &str) -> &str {
    let Some(rest) = title.strip_prefix('(') else {
        return title;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return title;
    }
    rest[digits..]
        .strip_prefix(") ")
        .unwrap_or(title)
}

/// Decorate a window title with the unread count
///
/// Applying it repeatedly with the same count yields the same title.
pub fn decorate_title(title: &str, count: usize) -> String {
    let base = strip_title_count(title);
    if count > 0 {
        format!("({count}) {base}")
    } else {
        base.to_string()
    }
}

/// Alert text for newly posted discussions
pub fn new_discussions_message(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} new discussion{plural} available")
}

/// Unread counter shown next to the title
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Badge {
    count: usize,
}

impl Badge {
    pub fn is_visible(&self) -> bool {
        self.count > 0
    }

    pub fn text(&self) -> Option<String> {
        badge_text(self.count)
    }
}

/// Transient, self-dismissing alert
#[derive(Debug, Clone)]
pub struct Alert {
    pub message: String,
    raised_at: Instant,
    ttl: Duration,
}

impl Alert {
    pub fn new(message: String, ttl: Duration) -> Self {
        Self {
            message,
            raised_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.raised_at.elapsed() >= self.ttl
    }
}

/// The visible notification affordances
#[derive(Debug, Clone)]
pub struct Surface {
    badge: Option<Badge>,
    panel: Option<Vec<NotificationView>>,
    title: String,
    alert: Option<Alert>,
    recent: Vec<RecentDiscussion>,
}

impl Surface {
    /// Create a surface; `with_badge`/`with_panel` choose which targets exist
    pub fn new(title: &str, with_badge: bool, with_panel: bool) -> Self {
        Self {
            badge: with_badge.then(Badge::default),
            panel: with_panel.then(Vec::new),
            title: title.to_string(),
            alert: None,
            recent: Vec::new(),
        }
    }

    pub fn badge(&self) -> Option<&Badge> {
        self.badge.as_ref()
    }

    pub fn panel(&self) -> Option<&[NotificationView]> {
        self.panel.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn recent(&self) -> &[RecentDiscussion] {
        &self.recent
    }

    /// Set the badge count and redecorate the title
    pub fn set_unread(&mut self, count: usize) {
        if let Some(badge) = self.badge.as_mut() {
            badge.count = count;
        }
        self.title = decorate_title(&self.title, count);
    }

    /// Replace the panel contents wholesale
    pub fn replace_panel(&mut self, views: Vec<NotificationView>) {
        if let Some(panel) = self.panel.as_mut() {
            *panel = views;
        }
    }

    /// Drop the unread affordances of one row; returns false if not rendered
    pub fn mark_read(&mut self, notification_id: u64) -> bool {
        let Some(panel) = self.panel.as_mut() else {
            return false;
        };
        match panel.iter_mut().find(|v| v.id == notification_id) {
            Some(view) => {
                view.unread = false;
                true
            }
            None => false,
        }
    }

    /// Ids of rendered rows still showing as unread
    pub fn unread_ids(&self) -> Vec<u64> {
        self.panel
            .iter()
            .flatten()
            .filter(|v| v.unread)
            .map(|v| v.id)
            .collect()
    }

    /// Show an alert, replacing any existing one
    pub fn raise_alert(&mut self, alert: Alert) {
        self.alert = Some(alert);
    }

    pub fn dismiss_alert(&mut self) -> bool {
        self.alert.take().is_some()
    }

    /// Drop the alert once its time is up; returns true if it was removed
    pub fn expire_alert(&mut self) -> bool {
        if self.alert.as_ref().is_some_and(Alert::is_expired) {
            self.alert = None;
            return true;
        }
        false
    }

    /// Prepend newly reported discussions, replacing older copies by id
    pub fn merge_recent(&mut self, discussions: Vec<RecentDiscussion>) {
        self.recent
            .retain(|old| !discussions.iter().any(|new| new.id == old.id));
        let mut merged = discussions;
        merged.append(&mut self.recent);
        merged.truncate(MAX_RECENT);
        self.recent = merged;
    }

    /// Apply the server's view of a discussion's reactions
    pub fn apply_reaction(&mut self, discussion_id: u64, response: &ReactionResponse) -> bool {
        let Some(discussion) = self.recent.iter_mut().find(|d| d.id == discussion_id) else {
            return false;
        };
        discussion.like_count = response.like_count;
        discussion.dislike_count = response.dislike_count;
        discussion.user_reaction = response.user_reaction;
        true
    }
}
