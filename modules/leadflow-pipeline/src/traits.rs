// Trait abstractions for the pipeline's collaborators.
//
// Scraper, Enricher and DeliveryBackend wrap the three SaaS APIs; Notifier is
// the chat surface; Throttle owns every deliberate pause. The controller only
// sees these traits, so runs are testable with the mocks in `testing` and no
// network.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::stats::RunStatistics;
use crate::types::{BulkCounts, EnrichedContact, EnrichmentLookup, PipelineTrigger, ThreadRef};

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post a progress message to the run's thread.
    async fn send_status(&self, thread: &ThreadRef, text: &str) -> Result<()>;

    /// Post the final run statistics.
    async fn send_summary(&self, thread: &ThreadRef, stats: &RunStatistics) -> Result<()>;

    /// Post a run-aborting error.
    async fn send_error(&self, thread: &ThreadRef, text: &str) -> Result<()>;

    /// Pull a trigger out of an inbound chat message, if it holds one.
    fn parse_trigger(&self, raw_text: &str) -> Option<PipelineTrigger> {
        crate::trigger::parse_trigger(raw_text)
    }
}

// ---------------------------------------------------------------------------
// Scraper
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Raw engagement records for a post. Shapes vary by scrape source.
    async fn post_engagers(&self, post_url: &str) -> Result<Vec<Value>>;
}

// ---------------------------------------------------------------------------
// Enricher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichError {
    /// The backend asked us to slow down; the same lookup may be retried.
    #[error("rate limited")]
    RateLimited,

    #[error("enrichment failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait Enricher: Send + Sync {
    /// Look up one profile. `Ok(None)` means the backend has no match.
    async fn enrich_one(&self, profile_url: &str) -> Result<Option<EnrichmentLookup>, EnrichError>;
}

// ---------------------------------------------------------------------------
// DeliveryBackend
// ---------------------------------------------------------------------------

#[async_trait]
pub trait DeliveryBackend: Send + Sync {
    /// Upload every contact in one request.
    async fn submit_bulk(&self, contacts: &[EnrichedContact]) -> Result<BulkCounts>;

    /// Upload a single contact.
    async fn submit_one(&self, contact: &EnrichedContact) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Throttle
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Throttle: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioThrottle;

#[async_trait]
impl Throttle for TokioThrottle {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
