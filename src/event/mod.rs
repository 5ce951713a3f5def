pub mod input;

use crate::models::{NotificationItem, ReactionResponse, RecentDiscussion};
use crate::reaction::ReactionAction;

/// Whether the terminal currently has the user's attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Application events
#[derive(Debug)]
pub enum Event {
    /// Keyboard input
    Key(crossterm::event::KeyEvent),
    /// Terminal focus gained or lost
    Focus(Visibility),
    /// Result of background work started by the poller
    Notifier(NotifierEvent),
    /// Server accepted a reaction change
    Reaction {
        discussion_id: u64,
        action: ReactionAction,
        response: ReactionResponse,
    },
}

/// Completions and timer ticks routed back into the poller
#[derive(Debug)]
pub enum NotifierEvent {
    /// Poll timer fired
    PollTick,
    /// "Recent" endpoint answered
    RecentLoaded(Vec<RecentDiscussion>),
    /// Unread notification list answered
    NotificationsLoaded(Vec<NotificationItem>),
    /// A read receipt finished (successfully or not)
    MarkReadFinished { notification_id: u64, ok: bool },
    /// Refresh the notification list
    ReloadNotifications,
}
