//! Shared fixtures for unit tests

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::api::DiscussionApi;
use crate::context::PageContext;
use crate::errors::{MarqueeError, Result};
use crate::models::{Actor, NotificationItem, ReactionResponse, RecentDiscussion};
use crate::reaction::{Reaction, ReactionAction};

/// Scripted stand-in for the server
#[derive(Default)]
pub struct FakeApi {
    pub recent: Mutex<Vec<RecentDiscussion>>,
    pub unread: Mutex<Vec<NotificationItem>>,
    pub fail_recent: bool,
    pub fail_unread: bool,
    pub fail_mark: Vec<u64>,
    pub recent_calls: Mutex<Vec<(PageContext, DateTime<Utc>)>>,
    pub mark_calls: Mutex<Vec<u64>>,
    pub react_calls: Mutex<Vec<(u64, ReactionAction)>>,
}

#[async_trait::async_trait]
impl DiscussionApi for FakeApi {
    async fn recent(
        &self,
        context: PageContext,
        since: DateTime<Utc>,
        _limit: usize,
    ) -> Result<Vec<RecentDiscussion>> {
        self.recent_calls.lock().unwrap().push((context, since));
        if self.fail_recent {
            return Err(MarqueeError::Status {
                status: 500,
                url: "fake://recent".to_string(),
            });
        }
        Ok(self.recent.lock().unwrap().clone())
    }

    async fn unread_notifications(&self) -> Result<Vec<NotificationItem>> {
        if self.fail_unread {
            return Err(MarqueeError::Decode {
                url: "fake://notifications".to_string(),
                reason: "expected value at line 1 column 1".to_string(),
            });
        }
        Ok(self.unread.lock().unwrap().clone())
    }

    async fn mark_read(&self, notification_id: u64) -> Result<()> {
        self.mark_calls.lock().unwrap().push(notification_id);
        if self.fail_mark.contains(&notification_id) {
            return Err(MarqueeError::Status {
                status: 404,
                url: format!("fake://notifications/{notification_id}/read"),
            });
        }
        Ok(())
    }

    async fn react(
        &self,
        discussion_id: u64,
        action: ReactionAction,
    ) -> Result<ReactionResponse> {
        self.react_calls.lock().unwrap().push((discussion_id, action));
        let user_reaction = match action {
            ReactionAction::Set(reaction) => Some(reaction),
            ReactionAction::Remove => None,
        };
        Ok(ReactionResponse {
            success: true,
            like_count: u32::from(user_reaction == Some(Reaction::Like)),
            dislike_count: u32::from(user_reaction == Some(Reaction::Dislike)),
            user_reaction,
        })
    }
}

/// Unread notification from `user<id>` about discussion `100 + id`
pub fn notification(id: u64) -> NotificationItem {
    NotificationItem {
        id,
        message: "replied to your discussion".to_string(),
        created_at: Utc::now(),
        trigger_user: Actor {
            username: format!("user{id}"),
            full_name: None,
            profile_picture: None,
        },
        discussion_id: Some(100 + id),
        is_read: false,
        notification_type: Some("reply".to_string()),
    }
}

/// Minimal recent discussion
pub fn discussion(id: u64) -> RecentDiscussion {
    serde_json::from_value(serde_json::json!({ "id": id, "title": "New thread" })).unwrap()
}
