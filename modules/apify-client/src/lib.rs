pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{PostEngagersInput, RunData, RunStatus};

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor used for LinkedIn post reactions and comments when none is configured.
pub const DEFAULT_POST_ENGAGERS_ACTOR: &str = "curious_coder~linkedin-post-reactions-scraper";

/// Longest a single run may take before we give up polling it.
const DEFAULT_MAX_RUN_WAIT: Duration = Duration::from_secs(15 * 60);

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    max_run_wait: Duration,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
            max_run_wait: DEFAULT_MAX_RUN_WAIT,
        }
    }

    /// Point the client at a different API root (staging, local proxy).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_run_wait(mut self, max_run_wait: Duration) -> Self {
        self.max_run_wait = max_run_wait;
        self
    }

    /// Start an actor run. Returns as soon as Apify has accepted it.
    pub async fn start_run<I>(&self, actor_id: &str, input: &I) -> Result<RunData>
    where
        I: Serialize + ?Sized,
    {
        let resp = self
            .client
            .post(format!("{}/acts/{}/runs", self.base_url, actor_id))
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let envelope: ApiResponse<RunData> = ensure_success(resp).await?.json().await?;
        Ok(envelope.data)
    }

    /// Long-poll a run (`waitForFinish=60`) until it succeeds, fails, or
    /// outlives `max_run_wait`.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        let started = Instant::now();
        loop {
            let resp = self
                .client
                .get(format!("{}/actor-runs/{}?waitForFinish=60", self.base_url, run_id))
                .bearer_auth(&self.token)
                .send()
                .await?;

            let run = ensure_success(resp).await?.json::<ApiResponse<RunData>>().await?.data;
            match run.run_status() {
                RunStatus::Succeeded => return Ok(run),
                s if s.is_terminal_failure() => {
                    return Err(ApifyError::RunFailed {
                        run_id: run.id,
                        status: run.status,
                    });
                }
                _ if started.elapsed() >= self.max_run_wait => {
                    return Err(ApifyError::RunTimedOut {
                        run_id: run.id,
                        waited_secs: started.elapsed().as_secs(),
                    });
                }
                _ => tracing::debug!(run_id, status = %run.status, "Run still in progress"),
            }
        }
    }

    /// Items of a dataset, cleaned of empty fields.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let resp = self
            .client
            .get(format!(
                "{}/datasets/{}/items?format=json&clean=true",
                self.base_url, dataset_id
            ))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Ok(ensure_success(resp).await?.json().await?)
    }

    /// Start, wait, then fetch the run's default dataset.
    pub async fn run_actor<I, T>(&self, actor_id: &str, input: &I) -> Result<Vec<T>>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let run = self.start_run(actor_id, input).await?;
        tracing::info!(actor_id, run_id = %run.id, "Apify run started");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Apify run finished, fetching dataset"
        );

        self.get_dataset_items(&completed.default_dataset_id).await
    }

    /// Scrape the reactions and comments of a LinkedIn post.
    ///
    /// Records come back as raw JSON because engagement actors do not agree on
    /// a schema; callers pick profile links out of them.
    pub async fn scrape_post_engagers(
        &self,
        actor_id: &str,
        post_url: &str,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>> {
        tracing::info!(actor_id, post_url, limit, "Scraping LinkedIn post engagers");

        let input = PostEngagersInput::new(post_url, limit);
        let records: Vec<serde_json::Value> = self.run_actor(actor_id, &input).await?;
        tracing::info!(count = records.len(), "Fetched post engagement records");

        Ok(records)
    }
}

/// Turn a non-2xx response into `ApifyError::Api` carrying the body text.
async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(ApifyError::Api {
        status: status.as_u16(),
        message,
    })
}
