//! Error types for the browser harness

use thiserror::Error;

use crate::locator::Locator;

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Playwright not found. Install with: npm install playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Driver failed to start: {0}")]
    DriverStartup(String),

    #[error("Driver protocol violation: {0}")]
    Protocol(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("{action} failed on {locator}: {reason}")]
    Action {
        action: &'static str,
        locator: String,
        reason: String,
    },

    #[error("Navigation to {url} not reached: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// Attach action context to a raw driver failure.
    pub(crate) fn in_action(self, action: &'static str, locator: &Locator) -> Self {
        match self {
            HarnessError::Driver(reason) => HarnessError::Action {
                action,
                locator: locator.to_string(),
                reason,
            },
            other => other,
        }
    }

    pub(crate) fn in_navigation(self, url: &str) -> Self {
        match self {
            HarnessError::Driver(reason) => HarnessError::Navigation {
                url: url.to_string(),
                reason,
            },
            other => other,
        }
    }

    pub(crate) fn in_assertion(self, expectation: String) -> Self {
        match self {
            HarnessError::Driver(reason) => {
                HarnessError::AssertionFailed(format!("{}: {}", expectation, reason))
            }
            other => other,
        }
    }
}
