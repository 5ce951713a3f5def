use super::{Event, Visibility};
use crossterm::event::{self, Event as CrosstermEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Listen for keyboard and focus events with graceful shutdown support
pub async fn listen(tx: mpsc::Sender<Event>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            // Check for cancellation signal
            () = cancel.cancelled() => {
                tracing::debug!("Input listener cancelled");
                break;
            }
            // Poll for input with timeout
            () = tokio::time::sleep(Duration::from_millis(100)) => {
                // Drain everything that queued up during the sleep
                while event::poll(Duration::ZERO).unwrap_or(false) {
                    let Some(event) = event::read().ok().and_then(translate) else {
                        continue;
                    };
                    if tx.send(event).await.is_err() {
                        // Channel closed, exit
                        return;
                    }
                }
            }
        }
    }
}

fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) => Some(Event::Key(key)),
        CrosstermEvent::FocusGained => Some(Event::Focus(Visibility::Visible)),
        CrosstermEvent::FocusLost => Some(Event::Focus(Visibility::Hidden)),
        _ => None,
    }
}
