use serde::{Deserialize, Serialize};

/// Body for `chat.postMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct PostMessageRequest<'a> {
    pub channel: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<&'a str>,
    pub unfurl_links: bool,
}

/// Web API envelope. Slack answers 200 even on failure and sets `ok: false`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,
    pub error: Option<String>,
    pub channel: Option<String>,
    pub ts: Option<String>,
}

/// Outer payload posted to an Events API request URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    UrlVerification { challenge: String },
    EventCallback { event: MessageEvent },
    #[serde(other)]
    Unsupported,
}

/// `message` and `app_mention` events share these fields.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub subtype: Option<String>,
    pub text: Option<String>,
    pub user: Option<String>,
    pub bot_id: Option<String>,
    pub channel: Option<String>,
    pub ts: Option<String>,
    pub thread_ts: Option<String>,
}

impl MessageEvent {
    /// True for human-authored, new messages. Bot posts (including our own
    /// status replies) and edits/deletes carry a `bot_id` or `subtype`.
    pub fn is_user_message(&self) -> bool {
        matches!(self.kind.as_str(), "message" | "app_mention")
            && self.bot_id.is_none()
            && self.subtype.is_none()
    }

    /// The thread replies should go to: the existing thread, or a new one
    /// rooted at this message.
    pub fn reply_thread_ts(&self) -> Option<&str> {
        self.thread_ts.as_deref().or(self.ts.as_deref())
    }
}
