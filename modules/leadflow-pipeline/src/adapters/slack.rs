use anyhow::Result;
use async_trait::async_trait;
use slack_client::SlackService;

use crate::stats::RunStatistics;
use crate::traits::Notifier;
use crate::types::ThreadRef;

/// Posts run updates as replies in the triggering Slack thread.
pub struct SlackNotifier {
    slack: SlackService,
}

impl SlackNotifier {
    pub fn new(slack: SlackService) -> Self {
        Self { slack }
    }

    async fn post(&self, thread: &ThreadRef, text: &str) -> Result<()> {
        self.slack
            .post_message(&thread.channel, thread.thread_ts.as_deref(), text)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send_status(&self, thread: &ThreadRef, text: &str) -> Result<()> {
        self.post(thread, text).await
    }

    async fn send_summary(&self, thread: &ThreadRef, stats: &RunStatistics) -> Result<()> {
        self.post(thread, &format!(":white_check_mark: {stats}")).await
    }

    async fn send_error(&self, thread: &ThreadRef, text: &str) -> Result<()> {
        self.post(thread, text).await
    }
}
