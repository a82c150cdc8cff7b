use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Input for a LinkedIn post engagement actor.
///
/// Engagement actors disagree on input naming, so both the plural `postUrls`
/// and the single `postUrl` are sent; actors ignore unknown keys.
#[derive(Debug, Clone, Serialize)]
pub struct PostEngagersInput {
    #[serde(rename = "postUrls")]
    pub post_urls: Vec<String>,
    #[serde(rename = "postUrl")]
    pub post_url: String,
    #[serde(rename = "includeReactions")]
    pub include_reactions: bool,
    #[serde(rename = "includeComments")]
    pub include_comments: bool,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
}

impl PostEngagersInput {
    pub fn new(post_url: &str, max_items: u32) -> Self {
        Self {
            post_urls: vec![post_url.to_string()],
            post_url: post_url.to_string(),
            include_reactions: true,
            include_comments: true,
            max_items,
        }
    }
}

/// Terminal and in-flight states of an actor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    Aborted,
    TimedOut,
    Other,
}

impl RunStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "READY" => Self::Ready,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "ABORTED" | "ABORTING" => Self::Aborted,
            "TIMED-OUT" | "TIMING-OUT" => Self::TimedOut,
            _ => Self::Other,
        }
    }

    pub fn is_terminal_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Aborted | Self::TimedOut)
    }
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunData {
    pub fn run_status(&self) -> RunStatus {
        RunStatus::parse(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_status_classifies_terminal_failures() {
        assert!(RunStatus::parse("FAILED").is_terminal_failure());
        assert!(RunStatus::parse("TIMED-OUT").is_terminal_failure());
        assert!(RunStatus::parse("ABORTED").is_terminal_failure());
        assert!(!RunStatus::parse("RUNNING").is_terminal_failure());
        assert_eq!(RunStatus::parse("SUCCEEDED"), RunStatus::Succeeded);
    }

    #[test]
    fn run_data_deserializes_from_api_payload() {
        let json = r#"{"data":{"id":"run1","status":"SUCCEEDED","defaultDatasetId":"ds1","startedAt":null,"finishedAt":null}}"#;
        let resp: ApiResponse<RunData> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data.default_dataset_id, "ds1");
        assert_eq!(resp.data.run_status(), RunStatus::Succeeded);
    }

    #[test]
    fn engagers_input_serializes_both_url_spellings() {
        let input = PostEngagersInput::new("https://www.linkedin.com/posts/x-activity-1", 500);
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["postUrls"][0], "https://www.linkedin.com/posts/x-activity-1");
        assert_eq!(value["postUrl"], "https://www.linkedin.com/posts/x-activity-1");
        assert_eq!(value["maxItems"], 500);
    }
}
