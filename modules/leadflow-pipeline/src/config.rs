use std::time::Duration;

/// Throughput knobs for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Enrichment calls in flight per wave.
    pub batch_width: usize,
    /// Pause between enrichment waves (not after the last).
    pub batch_delay: Duration,
    /// Pause before retrying a rate-limited lookup.
    pub rate_limit_backoff: Duration,
    /// Retries per profile after the first rate-limited attempt.
    pub max_rate_limit_retries: u32,
    /// Pause between per-contact submissions on the fallback path.
    pub delivery_pacing: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_width: 5,
            batch_delay: Duration::from_millis(1000),
            rate_limit_backoff: Duration::from_millis(5000),
            max_rate_limit_retries: 3,
            delivery_pacing: Duration::from_millis(200),
        }
    }
}
