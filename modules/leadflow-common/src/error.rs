use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadflowError {
    #[error("Configuration error: {0}")]
    Config(String),
}
