//! Navigation: opening and sharing discussion threads

use super::{App, Pane};
use crate::api::thread_url;

/// Discussion id under the cursor, whichever list has focus
fn selected_discussion_id(app: &App) -> Option<u64> {
    let surface = app.notifier.surface();
    match app.pane {
        Pane::Notifications => surface
            .panel()?
            .get(app.selected_notification)?
            .discussion_id,
        Pane::Discussions => surface.recent().get(app.selected_discussion).map(|d| d.id),
    }
}

/// Open the selected thread in the browser
///
/// Opening from the notification panel marks that notification read first.
pub fn open_selected(app: &mut App) {
    let Some(discussion_id) = selected_discussion_id(app) else {
        return;
    };

    if app.pane == Pane::Notifications {
        if let Some(notification_id) = app.selected_notification_id() {
            app.notifier.view_discussion(notification_id);
        }
    }

    let url = thread_url(&app.base, &app.namespace, discussion_id);
    match open_in_browser(&url, app.browser.as_deref()) {
        Ok(()) => app.show_status(&format!("Opened {url}")),
        Err(reason) => {
            tracing::warn!(url = %url, reason = %reason, "Failed to open browser");
            app.show_status(&format!("Open manually: {url}"));
        }
    }
}

/// Show the selected thread's link in the footer
pub fn share_selected(app: &mut App) {
    if let Some(discussion_id) = selected_discussion_id(app) {
        let url = thread_url(&app.base, &app.namespace, discussion_id);
        app.show_status(&format!("Link: {url}"));
    }
}

/// Hand a URL to the platform opener, or to `browser` when configured
///
/// The opener is detached with its stdio closed, so a long-lived browser
/// never holds up the event loop.
fn open_in_browser(url: &str, browser: Option<&str>) -> std::io::Result<()> {
    match browser {
        Some(app) => open::with_detached(url, app),
        None => open::that_detached(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{app_with, key, notification};
    use crate::testing::{discussion, FakeApi};
    use chrono::Utc;
    use crossterm::event::KeyCode;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_share_notification_link() {
        let (mut app, _rx) = app_with(FakeApi::default());
        app.notifier
            .apply_notifications(&[notification(4)], Utc::now());

        share_selected(&mut app);

        let (message, _) = app.status_message.clone().unwrap();
        assert_eq!(message, "Link: http://127.0.0.1:5000/discussions/thread/104");
    }

    #[tokio::test]
    async fn test_share_discussion_link() {
        let (mut app, _rx) = app_with(FakeApi::default());
        app.notifier.apply_recent(vec![discussion(9)], Utc::now());
        app.handle_key(key(KeyCode::Tab));

        share_selected(&mut app);

        let (message, _) = app.status_message.clone().unwrap();
        assert!(message.ends_with("/discussions/thread/9"));
    }

    #[tokio::test]
    async fn test_share_with_empty_lists_is_silent() {
        let (mut app, _rx) = app_with(FakeApi::default());
        share_selected(&mut app);
        assert!(app.status_message.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_open_does_not_wait_for_browser_exit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let browser = dir.path().join("slow-browser");
        std::fs::write(&browser, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&browser, std::fs::Permissions::from_mode(0o755)).unwrap();

        let started = Instant::now();
        open_in_browser(
            "http://127.0.0.1:5000/discussions/thread/1",
            browser.to_str(),
        )
        .unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_open_failure_falls_back_to_link() {
        let (mut app, _rx) = app_with(FakeApi::default());
        app.browser = Some("/nonexistent/marquee-browser".to_string());
        app.notifier.apply_recent(vec![discussion(5)], Utc::now());
        app.handle_key(key(KeyCode::Tab));

        open_selected(&mut app);

        let (message, _) = app.status_message.clone().unwrap();
        assert_eq!(message, "Open manually: http://127.0.0.1:5000/discussions/thread/5");
    }
}
