use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::delivery::DeliverySubmitter;
use crate::enrichment::EnrichmentBatcher;
use crate::error::PipelineError;
use crate::extractor::extract_profile_urls;
use crate::stats::RunStatistics;
use crate::traits::{DeliveryBackend, Enricher, Notifier, Scraper, Throttle, TokioThrottle};
use crate::types::{PipelineTrigger, ThreadRef};

/// Where a run is. `Done` and `Errored` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Scraping,
    Enriching,
    Delivering,
    Done,
    Errored,
}

/// Sequences scrape → enrich → deliver for one post and reports to chat.
///
/// Holds no state between runs apart from a guard that keeps a second
/// trigger from starting while a run is in flight.
pub struct PipelineController {
    scraper: Arc<dyn Scraper>,
    enricher: Arc<dyn Enricher>,
    delivery: Arc<dyn DeliveryBackend>,
    notifier: Arc<dyn Notifier>,
    throttle: Arc<dyn Throttle>,
    config: PipelineConfig,
    run_lock: Mutex<()>,
}

impl PipelineController {
    pub fn new(
        scraper: Arc<dyn Scraper>,
        enricher: Arc<dyn Enricher>,
        delivery: Arc<dyn DeliveryBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            scraper,
            enricher,
            delivery,
            notifier,
            throttle: Arc::new(TokioThrottle),
            config: PipelineConfig::default(),
            run_lock: Mutex::new(()),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_throttle(mut self, throttle: Arc<dyn Throttle>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// True while a run holds the guard.
    pub fn is_busy(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    /// Run the pipeline for one trigger.
    ///
    /// Returns the final statistics once the run reaches `Done`. A stage
    /// failure posts an error to the thread and is returned to the caller.
    pub async fn run(
        &self,
        trigger: &PipelineTrigger,
        thread: &ThreadRef,
    ) -> Result<RunStatistics, PipelineError> {
        let Ok(_guard) = self.run_lock.try_lock() else {
            warn!(
                post_url = trigger.post_url.as_str(),
                "Rejecting trigger, run already in progress"
            );
            self.status(
                thread,
                ":hourglass: A run is already in progress. Send the post again once it finishes.",
            )
            .await;
            return Err(PipelineError::RunInProgress);
        };

        let mut state = RunState::Idle;
        match self.execute(trigger, thread, &mut state).await {
            Ok(stats) => {
                transition(&mut state, RunState::Done);
                Ok(stats)
            }
            Err(e) => {
                error!(failed_in = ?state, error = %e, "Pipeline run aborted");
                transition(&mut state, RunState::Errored);
                if let Err(notify_err) = self
                    .notifier
                    .send_error(thread, &format!(":x: Pipeline failed: {e}"))
                    .await
                {
                    warn!(error = %notify_err, "Failed to post error notification");
                }
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        trigger: &PipelineTrigger,
        thread: &ThreadRef,
        state: &mut RunState,
    ) -> Result<RunStatistics, PipelineError> {
        let mut stats = RunStatistics::default();

        // Scrape
        transition(state, RunState::Scraping);
        self.status(
            thread,
            &format!(":mag: Scraping engagers from {}", trigger.post_url),
        )
        .await;

        let records = self
            .scraper
            .post_engagers(&trigger.post_url)
            .await
            .map_err(|e| PipelineError::Scrape(format!("{e:#}")))?;
        let profile_urls = extract_profile_urls(&records);
        stats.engagers = profile_urls.len() as u32;
        info!(
            records = records.len(),
            engagers = stats.engagers,
            "Engagers extracted"
        );

        if profile_urls.is_empty() {
            self.status(thread, ":shrug: No engagers found on this post.").await;
            self.summary(thread, &stats).await;
            return Ok(stats);
        }

        // Enrich
        transition(state, RunState::Enriching);
        self.status(
            thread,
            &format!(
                ":busts_in_silhouette: Found {} engagers. Looking up verified emails...",
                stats.engagers
            ),
        )
        .await;

        let batcher =
            EnrichmentBatcher::new(self.enricher.as_ref(), self.throttle.as_ref(), &self.config);
        let contacts = batcher.enrich_all(&profile_urls).await;
        stats.enriched = contacts.len() as u32;

        if contacts.is_empty() {
            self.status(thread, ":shrug: No verified emails found for these engagers.")
                .await;
            self.summary(thread, &stats).await;
            return Ok(stats);
        }

        // Deliver
        transition(state, RunState::Delivering);
        self.status(
            thread,
            &format!(
                ":email: Found {} verified emails. Pushing to campaign...",
                stats.enriched
            ),
        )
        .await;

        let report = DeliverySubmitter::new(
            self.delivery.as_ref(),
            self.throttle.as_ref(),
            self.config.delivery_pacing,
        )
        .submit(&contacts)
        .await;
        stats.pushed = report.added;
        stats.failed = report.failed;

        for outcome in report.outcomes.iter().filter(|o| !o.success) {
            warn!(
                email = outcome.email.as_str(),
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "Contact not delivered"
            );
        }

        self.summary(thread, &stats).await;
        Ok(stats)
    }

    async fn status(&self, thread: &ThreadRef, text: &str) {
        if let Err(e) = self.notifier.send_status(thread, text).await {
            warn!(error = %e, "Failed to post status update");
        }
    }

    async fn summary(&self, thread: &ThreadRef, stats: &RunStatistics) {
        info!(
            engagers = stats.engagers,
            enriched = stats.enriched,
            pushed = stats.pushed,
            failed = stats.failed,
            "Pipeline run complete"
        );
        if let Err(e) = self.notifier.send_summary(thread, stats).await {
            warn!(error = %e, "Failed to post run summary");
        }
    }
}

fn transition(state: &mut RunState, next: RunState) {
    tracing::debug!(from = ?*state, to = ?next, "Run state transition");
    *state = next;
}
