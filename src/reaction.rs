//! Like/dislike reactions on discussions
//!
//! The user's current reaction is an explicit field sourced from the server
//! (`user_reaction`), never inferred from how a button is drawn.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reaction the user can hold on a discussion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Dislike,
}

/// Action sent to the server's reaction endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionAction {
    Set(Reaction),
    Remove,
}

impl ReactionAction {
    /// Path segment understood by `/<ns>/like/<id>/<action>`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set(Reaction::Like) => "like",
            Self::Set(Reaction::Dislike) => "dislike",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for ReactionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide what pressing `pressed` does given the current reaction
///
/// Pressing the reaction already held clears it; anything else switches to
/// the pressed reaction.
pub fn toggle_action(current: Option<Reaction>, pressed: Reaction) -> ReactionAction {
    if current == Some(pressed) {
        ReactionAction::Remove
    } else {
        ReactionAction::Set(pressed)
    }
}

/// Short confirmation shown after the server accepts a reaction
pub fn feedback(action: ReactionAction) -> &'static str {
    match action {
        ReactionAction::Set(Reaction::Like) => "liked!",
        ReactionAction::Set(Reaction::Dislike) => "disliked!",
        ReactionAction::Remove => "Reaction removed",
    }
}
