use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::traits::{EnrichError, Enricher, Throttle};
use crate::types::EnrichedContact;

/// Resolves profile URLs to verified contacts in fixed-width waves.
///
/// Every lookup in a wave is dispatched before any is awaited; the next wave
/// starts only once the current one has settled, after `batch_delay`.
pub struct EnrichmentBatcher<'a> {
    enricher: &'a dyn Enricher,
    throttle: &'a dyn Throttle,
    config: &'a PipelineConfig,
}

impl<'a> EnrichmentBatcher<'a> {
    pub fn new(
        enricher: &'a dyn Enricher,
        throttle: &'a dyn Throttle,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            enricher,
            throttle,
            config,
        }
    }

    /// Enrich every URL. Misses and failures contribute nothing.
    pub async fn enrich_all(&self, profile_urls: &[String]) -> Vec<EnrichedContact> {
        let width = self.config.batch_width.max(1);
        let waves = profile_urls.len().div_ceil(width);
        let mut contacts = Vec::new();

        for (wave, batch) in profile_urls.chunks(width).enumerate() {
            let results = join_all(batch.iter().map(|url| self.enrich_with_retry(url))).await;
            let before = contacts.len();
            contacts.extend(results.into_iter().flatten());
            debug!(
                wave = wave + 1,
                waves,
                size = batch.len(),
                verified = contacts.len() - before,
                "Enrichment wave settled"
            );

            if wave + 1 < waves {
                self.throttle.pause(self.config.batch_delay).await;
            }
        }

        info!(
            profiles = profile_urls.len(),
            verified = contacts.len(),
            "Enrichment complete"
        );
        contacts
    }

    /// One profile, retrying rate-limited lookups up to the configured ceiling.
    async fn enrich_with_retry(&self, profile_url: &str) -> Option<EnrichedContact> {
        let mut retries = 0;
        loop {
            match self.enricher.enrich_one(profile_url).await {
                Ok(Some(lookup)) => return EnrichedContact::from_lookup(lookup, profile_url),
                Ok(None) => return None,
                Err(EnrichError::RateLimited) if retries < self.config.max_rate_limit_retries => {
                    retries += 1;
                    warn!(
                        profile_url,
                        attempt = retries,
                        backoff_ms = self.config.rate_limit_backoff.as_millis() as u64,
                        "Rate limited, backing off"
                    );
                    self.throttle.pause(self.config.rate_limit_backoff).await;
                }
                Err(EnrichError::RateLimited) => {
                    warn!(profile_url, retries, "Still rate limited, skipping profile");
                    return None;
                }
                Err(EnrichError::Failed(reason)) => {
                    debug!(
                        profile_url,
                        reason = reason.as_str(),
                        "Enrichment failed, skipping profile"
                    );
                    return None;
                }
            }
        }
    }
}
