pub mod adapters;
pub mod config;
pub mod controller;
pub mod delivery;
pub mod enrichment;
pub mod error;
pub mod extractor;
pub mod normalize;
pub mod stats;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod trigger;
pub mod types;

pub use config::PipelineConfig;
pub use controller::{PipelineController, RunState};
pub use error::PipelineError;
pub use stats::RunStatistics;
pub use types::{EnrichedContact, EnrichmentLookup, PipelineTrigger, ThreadRef};
