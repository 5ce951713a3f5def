//! Page context resolution
//!
//! The watcher follows exactly one place on the server: a content item's
//! discussion thread, a group's discussion list, or nothing at all. The
//! context is resolved once at start-up and decides which "recent" endpoint
//! the poller hits.

use std::fmt;

/// Where the user is "looking" for new discussions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageContext {
    /// Discussions attached to a movie/TV content item
    Content(u64),
    /// Discussions inside a watch group
    Group(u64),
    /// No discussion context; update checks are no-ops
    #[default]
    Other,
}

impl PageContext {
    /// Build a context from the mutually exclusive CLI/config ids
    pub fn from_ids(content: Option<u64>, group: Option<u64>) -> Self {
        match (content, group) {
            (Some(id), _) => Self::Content(id),
            (None, Some(id)) => Self::Group(id),
            (None, None) => Self::Other,
        }
    }

    /// Parse a browser-style page path, e.g. `/discussions/content/12`
    ///
    /// Unknown shapes resolve to `Other` rather than failing.
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [.., "content", id] => id.parse().map_or(Self::Other, Self::Content),
            [.., "group", id] => id.parse().map_or(Self::Other, Self::Group),
            _ => Self::Other,
        }
    }

    /// Path of the "what's new" endpoint for this context, if it has one
    pub fn recent_path(&self, namespace: &str) -> Option<String> {
        let ns = namespace.trim_matches('/');
        match self {
            Self::Content(id) => Some(format!("/{ns}/api/recent/{id}")),
            Self::Group(id) => Some(format!("/{ns}/api/recent/group/{id}")),
            Self::Other => None,
        }
    }

    /// Whether update checks can do anything in this context
    pub fn has_endpoint(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content(id) => write!(f, "content #{id}"),
            Self::Group(id) => write!(f, "group #{id}"),
            Self::Other => write!(f, "notifications only"),
        }
    }
}

/// Path of a single discussion thread page
pub fn thread_path(namespace: &str, discussion_id: u64) -> String {
    format!("/{}/thread/{discussion_id}", namespace.trim_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_content() {
        assert_eq!(
            PageContext::from_path("/discussions/content/12"),
            PageContext::Content(12)
        );
    }

    #[test]
    fn test_from_path_group_with_query() {
        assert_eq!(
            PageContext::from_path("/discussions/group/4?page=2"),
            PageContext::Group(4)
        );
    }

    #[test]
    fn test_from_path_unknown() {
        assert_eq!(PageContext::from_path("/watchlist"), PageContext::Other);
        assert_eq!(
            PageContext::from_path("/discussions/content/abc"),
            PageContext::Other
        );
    }

    #[test]
    fn test_recent_path() {
        assert_eq!(
            PageContext::Content(7).recent_path("discussions").as_deref(),
            Some("/discussions/api/recent/7")
        );
        assert_eq!(
            PageContext::Group(3).recent_path("/discussions/").as_deref(),
            Some("/discussions/api/recent/group/3")
        );
        assert_eq!(PageContext::Other.recent_path("discussions"), None);
    }

    #[test]
    fn test_from_ids_prefers_content() {
        assert_eq!(
            PageContext::from_ids(Some(1), Some(2)),
            PageContext::Content(1)
        );
        assert_eq!(PageContext::from_ids(None, Some(2)), PageContext::Group(2));
        assert_eq!(PageContext::from_ids(None, None), PageContext::Other);
    }

    #[test]
    fn test_thread_path() {
        assert_eq!(thread_path("discussions", 42), "/discussions/thread/42");
    }
}
