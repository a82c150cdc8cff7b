pub mod error;
pub mod signature;
pub mod types;

pub use error::{Result, SlackError};
pub use types::{EventEnvelope, MessageEvent, PostMessageRequest, PostMessageResponse};

use std::time::Duration;

const BASE_URL: &str = "https://slack.com/api";

#[derive(Debug, Clone)]
pub struct SlackOptions {
    pub bot_token: String,
    pub signing_secret: String,
}

#[derive(Debug, Clone)]
pub struct SlackService {
    client: reqwest::Client,
    options: SlackOptions,
    base_url: String,
}

impl SlackService {
    pub fn new(options: SlackOptions) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            options,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Post a message, optionally as a reply in `thread_ts`.
    pub async fn post_message(
        &self,
        channel: &str,
        thread_ts: Option<&str>,
        text: &str,
    ) -> Result<PostMessageResponse> {
        let url = format!("{}/chat.postMessage", self.base_url);
        let body = PostMessageRequest {
            channel,
            text,
            thread_ts,
            unfurl_links: false,
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.options.bot_token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SlackError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: PostMessageResponse = resp.json().await?;
        if !parsed.ok {
            return Err(SlackError::Api {
                status: status.as_u16(),
                message: parsed.error.unwrap_or_else(|| "unknown_error".to_string()),
            });
        }
        Ok(parsed)
    }

    /// Check an inbound Events API request against the signing secret.
    pub fn verify_request(
        &self,
        timestamp: &str,
        body: &[u8],
        signature: &str,
        now: i64,
    ) -> Result<()> {
        signature::verify(&self.options.signing_secret, timestamp, body, signature, now)
    }
}
