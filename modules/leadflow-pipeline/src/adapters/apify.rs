use anyhow::Result;
use apify_client::ApifyClient;
use async_trait::async_trait;
use serde_json::Value;

use crate::traits::Scraper;

/// Scrapes post engagers with an Apify actor.
pub struct ApifyScraper {
    client: ApifyClient,
    actor_id: String,
    max_items: u32,
}

impl ApifyScraper {
    pub fn new(client: ApifyClient, actor_id: Option<String>, max_items: u32) -> Self {
        Self {
            client,
            actor_id: actor_id
                .unwrap_or_else(|| apify_client::DEFAULT_POST_ENGAGERS_ACTOR.to_string()),
            max_items,
        }
    }
}

#[async_trait]
impl Scraper for ApifyScraper {
    async fn post_engagers(&self, post_url: &str) -> Result<Vec<Value>> {
        Ok(self
            .client
            .scrape_post_engagers(&self.actor_id, post_url, self.max_items)
            .await?)
    }
}
