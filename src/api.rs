//! REST client for the watch-together server
//!
//! [`DiscussionApi`] is the seam between the poller and the network: the TUI
//! uses [`HttpApi`], tests plug in a scripted fake.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::context::PageContext;
use crate::errors::{MarqueeError, Result};
use crate::models::{NotificationItem, ReactionResponse, RecentDiscussion};
use crate::reaction::ReactionAction;

/// Endpoints the client consumes
#[async_trait::async_trait]
pub trait DiscussionApi: Send + Sync + 'static {
    /// Discussions created after `since` in the given context (newest first)
    async fn recent(
        &self,
        context: PageContext,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<RecentDiscussion>>;

    /// The signed-in user's unread notifications (newest first)
    async fn unread_notifications(&self) -> Result<Vec<NotificationItem>>;

    /// Mark one notification read. Marking an already-read item is not an error.
    async fn mark_read(&self, notification_id: u64) -> Result<()>;

    /// Like, dislike or clear the user's reaction on a discussion
    async fn react(&self, discussion_id: u64, action: ReactionAction)
        -> Result<ReactionResponse>;
}

/// Format a watermark the way browsers' `toISOString()` does
pub fn format_since(since: DateTime<Utc>) -> String {
    since.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// HTTP implementation backed by reqwest
pub struct HttpApi {
    http: Client,
    base: Url,
    namespace: String,
}

impl HttpApi {
    /// Build a client for `base_url`
    ///
    /// `session` is the server's session cookie value, passed through as-is.
    pub fn new(
        base_url: &str,
        namespace: &str,
        session: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base = normalize_base(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        if let Some(session) = session.filter(|s| !s.is_empty()) {
            let value = HeaderValue::from_str(&format!("session={session}")).map_err(|e| {
                MarqueeError::Config(format!("session cookie is not a valid header: {e}"))
            })?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base,
            namespace: namespace.trim_matches('/').to_string(),
        })
    }

    /// Base URL requests are resolved against
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| MarqueeError::InvalidUrl {
                url: format!("{}{}", self.base, path),
                reason: e.to_string(),
            })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let url = response.url().to_string();
        let status = response.status();
        if !status.is_success() {
            return Err(MarqueeError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MarqueeError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl DiscussionApi for HttpApi {
    async fn recent(
        &self,
        context: PageContext,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<RecentDiscussion>> {
        let Some(path) = context.recent_path(&self.namespace) else {
            return Ok(Vec::new());
        };
        let url = self.endpoint(&path)?;
        let response = self
            .http
            .get(url)
            .query(&[
                ("since", format_since(since)),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn unread_notifications(&self) -> Result<Vec<NotificationItem>> {
        let url = self.endpoint(&format!("/{}/api/notifications", self.namespace))?;
        let response = self
            .http
            .get(url)
            .query(&[("unread_only", "true")])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn mark_read(&self, notification_id: u64) -> Result<()> {
        let url = self.endpoint(&format!(
            "/{}/api/notifications/{notification_id}/read",
            self.namespace
        ))?;
        let response = self.http.post(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MarqueeError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(())
    }

    async fn react(
        &self,
        discussion_id: u64,
        action: ReactionAction,
    ) -> Result<ReactionResponse> {
        let url = self.endpoint(&format!(
            "/{}/like/{discussion_id}/{}",
            self.namespace,
            action.as_str()
        ))?;
        // The server only answers with JSON when the request says it speaks JSON
        let response = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::decode(response).await
    }
}

/// Parse and normalize the server base URL so relative joins keep its path
pub fn normalize_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| MarqueeError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(MarqueeError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Absolute link to a discussion thread, for sharing and opening
pub fn thread_url(base: &Url, namespace: &str, discussion_id: u64) -> String {
    let path = crate::context::thread_path(namespace, discussion_id);
    base.join(path.trim_start_matches('/'))
        .map_or_else(|_| format!("{base}{path}"), |u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// One-shot HTTP server; the handle yields the raw request it received
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (HttpApi, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        let api = HttpApi::new(&base, "discussions", Some("abc"), Duration::from_secs(5)).unwrap();
        (api, handle)
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let (api, server) = serve_once("500 Internal Server Error", "{}").await;

        let err = api.unread_notifications().await.unwrap_err();
        assert!(matches!(err, MarqueeError::Status { status: 500, .. }));
        assert!(err.is_remote());

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /discussions/api/notifications?unread_only=true "));
        assert!(request.to_ascii_lowercase().contains("cookie: session=abc"));
    }

    #[tokio::test]
    async fn test_non_json_body_maps_to_decode() {
        let (api, server) = serve_once("200 OK", "<html>login</html>").await;

        let err = api.unread_notifications().await.unwrap_err();
        assert!(matches!(err, MarqueeError::Decode { .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_recent_sends_watermark_and_decodes() {
        let (api, server) = serve_once("200 OK", r#"[{"id": 7, "title": "Plot twist"}]"#).await;
        let since = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        let discussions = api.recent(PageContext::Content(3), since, 5).await.unwrap();
        assert_eq!(discussions.len(), 1);
        assert_eq!(discussions[0].id, 7);

        let request = server.await.unwrap();
        assert!(request.starts_with(
            "GET /discussions/api/recent/3?since=2024-05-01T10%3A00%3A00.000Z&limit=5 "
        ));
    }

    #[tokio::test]
    async fn test_mark_read_checks_status() {
        let (api, server) = serve_once("404 Not Found", "").await;
        let err = api.mark_read(9).await.unwrap_err();
        assert!(matches!(err, MarqueeError::Status { status: 404, .. }));
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /discussions/api/notifications/9/read "));

        let (api, server) = serve_once("200 OK", "").await;
        api.mark_read(9).await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_network() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let api = HttpApi::new(&base, "discussions", None, Duration::from_secs(5)).unwrap();
        let err = api.unread_notifications().await.unwrap_err();
        assert!(matches!(err, MarqueeError::Network(_)));
    }

    #[test]
    fn test_format_since_matches_iso_string() {
        let since = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(format_since(since), "2024-05-01T10:00:00.000Z");
    }

    #[test]
    fn test_normalize_base_adds_trailing_slash() {
        let url = normalize_base("https://watch.example.com/app").unwrap();
        assert_eq!(url.as_str(), "https://watch.example.com/app/");
    }

    #[test]
    fn test_normalize_base_rejects_other_schemes() {
        let err = normalize_base("ftp://watch.example.com").unwrap_err();
        assert!(matches!(err, MarqueeError::InvalidUrl { .. }));
        assert!(normalize_base("not a url").is_err());
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = HttpApi::new(
            "http://localhost:5000/app",
            "/discussions/",
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        let url = api
            .endpoint(&PageContext::Group(3).recent_path("discussions").unwrap())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/app/discussions/api/recent/group/3"
        );
    }

    #[test]
    fn test_thread_url() {
        let base = normalize_base("http://localhost:5000").unwrap();
        assert_eq!(
            thread_url(&base, "discussions", 12),
            "http://localhost:5000/discussions/thread/12"
        );
    }

    #[test]
    fn test_session_cookie_must_be_header_safe() {
        let result = HttpApi::new(
            "http://localhost:5000",
            "discussions",
            Some("bad\nvalue"),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(MarqueeError::Config(_))));
    }
}
