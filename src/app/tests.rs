use super::*;
use crate::context::PageContext;
use crate::event::{NotifierEvent, Visibility};
use crate::models::ReactionResponse;
use crate::notifier::PollSettings;
use crate::reaction::{Reaction, ReactionAction};
use crate::testing::FakeApi;
use crate::view::Surface;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub use crate::testing::notification;

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// App over a fake server, following content #1, title sync off
pub fn app_with(api: FakeApi) -> (App, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(64);
    let api: Arc<dyn DiscussionApi> = Arc::new(api);
    let settings = PollSettings {
        desktop_alerts: false,
        ..PollSettings::default()
    };
    let notifier = PollingNotifier::new(
        Arc::clone(&api),
        PageContext::Content(1),
        settings,
        Surface::new("Marquee", true, true),
        tx.clone(),
    );
    let base = crate::api::normalize_base("http://127.0.0.1:5000").unwrap();
    (App::new(notifier, api, tx, base, "discussions", false), rx)
}

#[tokio::test]
async fn test_notifications_event_marks_dirty_and_clamps() {
    let (mut app, _rx) = app_with(FakeApi::default());
    app.selected_notification = 5;
    app.rendered();

    app.handle_event(Event::Notifier(NotifierEvent::NotificationsLoaded(vec![
        notification(1),
        notification(2),
    ])));

    assert!(app.needs_render);
    assert_eq!(app.selected_notification, 1);
    assert_eq!(app.notifier.state().unread_count, 2);
}

#[tokio::test]
async fn test_focus_events_drive_polling() {
    let (mut app, _rx) = app_with(FakeApi::default());
    app.notifier.start();

    app.handle_event(Event::Focus(Visibility::Hidden));
    assert!(!app.notifier.state().is_active);

    app.handle_event(Event::Focus(Visibility::Visible));
    assert!(app.notifier.state().is_active);
}

#[tokio::test]
async fn test_failed_reaction_leaves_state() {
    let (mut app, _rx) = app_with(FakeApi::default());
    app.notifier
        .apply_recent(vec![crate::testing::discussion(2)], chrono::Utc::now());

    app.handle_event(Event::Reaction {
        discussion_id: 2,
        action: ReactionAction::Set(Reaction::Like),
        response: ReactionResponse {
            success: false,
            like_count: 9,
            dislike_count: 9,
            user_reaction: Some(Reaction::Like),
        },
    });

    assert_eq!(app.notifier.surface().recent()[0].like_count, 0);
    assert!(app.status_message.is_none());
}

#[tokio::test]
async fn test_tick_expires_status() {
    let (mut app, _rx) = app_with(FakeApi::default());
    app.status_message = Some((
        "old".to_string(),
        Instant::now() - Duration::from_secs(10),
    ));
    app.tick();
    assert!(app.status_message.is_none());
}
