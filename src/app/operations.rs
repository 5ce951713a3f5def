//! Reactions on recent discussions

use std::sync::Arc;

use super::{App, Pane};
use crate::event::Event;
use crate::reaction::{toggle_action, Reaction};

/// Toggle a reaction on the discussion under the cursor
///
/// The request runs in the background; the counts only change once the
/// server answers, since they are server-computed.
pub fn react_selected(app: &mut App, pressed: Reaction) {
    if app.pane != Pane::Discussions {
        app.show_status("Select a discussion first (Tab)");
        return;
    }
    let Some(discussion) = app
        .notifier
        .surface()
        .recent()
        .get(app.selected_discussion)
    else {
        return;
    };

    let discussion_id = discussion.id;
    let action = toggle_action(discussion.user_reaction, pressed);
    let api = Arc::clone(&app.api);
    let tx = app.event_tx.clone();

    tracing::debug!(discussion_id, %action, "Sending reaction");
    tokio::spawn(async move {
        match api.react(discussion_id, action).await {
            Ok(response) => {
                let _ = tx
                    .send(Event::Reaction {
                        discussion_id,
                        action,
                        response,
                    })
                    .await;
            }
            Err(e) => {
                tracing::warn!(discussion_id, error = %e, "Error updating reaction");
            }
        }
    });
}
