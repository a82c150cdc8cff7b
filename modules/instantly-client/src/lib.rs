pub mod error;
pub mod types;

pub use error::{InstantlyError, Result};
pub use types::{BulkLeadsRequest, BulkLeadsResponse, Lead, SingleLeadRequest};

use std::time::Duration;

const BASE_URL: &str = "https://api.instantly.ai/api/v2";

pub struct InstantlyClient {
    client: reqwest::Client,
    api_key: String,
    campaign_id: String,
    base_url: String,
}

impl InstantlyClient {
    pub fn new(api_key: String, campaign_id: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key,
            campaign_id,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Upload many leads to the campaign in one request.
    pub async fn add_leads(&self, leads: &[Lead]) -> Result<BulkLeadsResponse> {
        let url = format!("{}/leads/add", self.base_url);
        let body = BulkLeadsRequest {
            campaign_id: &self.campaign_id,
            skip_if_in_workspace: false,
            leads,
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(InstantlyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let parsed: BulkLeadsResponse = if text.trim().is_empty() {
            BulkLeadsResponse::default()
        } else {
            serde_json::from_str(&text)?
        };
        tracing::debug!(
            sent = leads.len(),
            uploaded = ?parsed.leads_uploaded,
            "Bulk lead upload accepted"
        );
        Ok(parsed)
    }

    /// Create a single lead in the campaign.
    pub async fn add_lead(&self, lead: &Lead) -> Result<()> {
        let url = format!("{}/leads", self.base_url);
        let body = SingleLeadRequest {
            campaign: &self.campaign_id,
            lead,
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(InstantlyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
