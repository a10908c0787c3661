//! Suite configuration
//!
//! Defaults target the hosted Todoist app. Everything can be overridden
//! through TODOFLOW_* environment variables, so the suite can be pointed
//! at a staging deployment without a rebuild.

use std::path::PathBuf;

/// Where the suite goes and where it leaves artifacts.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Public entry page carrying the "Log in" link.
    pub entry_url: String,

    /// Authenticated landing view reached after login.
    pub landing_url: String,

    /// Directory for failure screenshots.
    pub artifact_dir: PathBuf,

    /// Run the reachability preflight before each scenario.
    pub preflight: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            entry_url: "https://www.todoist.com/".to_string(),
            landing_url: "https://app.todoist.com/app/today".to_string(),
            artifact_dir: PathBuf::from("test-results/screenshots"),
            preflight: true,
        }
    }
}

impl SuiteConfig {
    /// Defaults overridden by TODOFLOW_* environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TODOFLOW_ENTRY_URL") {
            config.entry_url = url;
        }
        if let Ok(url) = std::env::var("TODOFLOW_LANDING_URL") {
            config.landing_url = url;
        }
        if let Ok(dir) = std::env::var("TODOFLOW_ARTIFACT_DIR") {
            config.artifact_dir = PathBuf::from(dir);
        }
        if let Ok(value) = std::env::var("TODOFLOW_PREFLIGHT") {
            config.preflight = value != "0";
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_hosted_app() {
        let config = SuiteConfig::default();
        assert_eq!(config.entry_url, "https://www.todoist.com/");
        assert_eq!(config.landing_url, "https://app.todoist.com/app/today");
        assert_eq!(
            config.artifact_dir,
            PathBuf::from("test-results/screenshots")
        );
        assert!(config.preflight);
    }
}
