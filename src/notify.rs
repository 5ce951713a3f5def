//! Cross-platform native desktop notifications
//!
//! Uses notify-rust for native notifications on macOS, Linux, and BSD.

use notify_rust::Notification;

/// How long the desktop notification stays up, in milliseconds
const DESKTOP_TIMEOUT_MS: i32 = 10_000;

/// Send a desktop notification without blocking the caller
///
/// Delivery failures (no notification daemon, sandboxed session) are logged
/// and otherwise ignored.
pub fn send(title: &str, message: &str) {
    let title = title.to_string();
    let message = message.to_string();

    std::thread::spawn(move || {
        if let Err(e) = Notification::new()
            .appname("marquee")
            .summary(&title)
            .body(&message)
            .timeout(DESKTOP_TIMEOUT_MS)
            .show()
        {
            tracing::debug!(error = %e, "Desktop notification failed");
        }
    });
}
