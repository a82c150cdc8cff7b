use thiserror::Error;

/// Failures that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Scraping failed: {0}")]
    Scrape(String),

    #[error("Another pipeline run is in progress")]
    RunInProgress,
}
