//! Error types for the E2E suite

use thiserror::Error;

use todoflow_harness::HarnessError;

pub type SuiteResult<T> = Result<T, SuiteError>;

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Harness error: {0}")]
    Harness(#[from] HarnessError),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("App unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
