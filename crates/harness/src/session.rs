//! Browser session lifecycle
//!
//! One `Session` owns one driver process, which owns one browser, context,
//! and page. Scenarios get their own session and their own account;
//! nothing is shared between concurrent sessions. Within a session every
//! operation is sequential: each action waits for its target to be
//! actionable, each assertion polls until its condition holds or the
//! configured timeout elapses.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::driver::{Command, DriverProcess, MouseButton};
use crate::error::{HarnessError, HarnessResult};
use crate::locator::Locator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Configuration for launching a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub browser: BrowserKind,

    /// Run without a visible window (default: true).
    pub headless: bool,

    pub viewport: Viewport,

    /// Timeout for page navigations.
    pub nav_timeout: Duration,

    /// Timeout for element actions (click, fill, press).
    pub action_timeout: Duration,

    /// Timeout for visibility/count assertions.
    pub assert_timeout: Duration,

    /// Timeout for the driver process ready handshake.
    pub startup_timeout: Duration,

    /// NODE_PATH override so the driver can resolve the playwright module
    /// from a non-default install location.
    pub node_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chromium,
            headless: true,
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            nav_timeout: Duration::from_secs(30),
            action_timeout: Duration::from_secs(15),
            assert_timeout: Duration::from_secs(5),
            startup_timeout: Duration::from_secs(30),
            node_path: None,
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by TODOFLOW_* environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(name) = std::env::var("TODOFLOW_BROWSER") {
            config.browser = match name.as_str() {
                "firefox" => BrowserKind::Firefox,
                "webkit" => BrowserKind::Webkit,
                _ => BrowserKind::Chromium,
            };
        }
        if let Ok(value) = std::env::var("TODOFLOW_HEADLESS") {
            config.headless = value != "0";
        }
        if let Ok(path) = std::env::var("TODOFLOW_NODE_PATH") {
            config.node_path = Some(PathBuf::from(path));
        }
        config
    }
}

/// An isolated browser session.
pub struct Session {
    driver: Mutex<DriverProcess>,
    config: SessionConfig,
}

impl Session {
    /// Spawn a driver process and launch the browser.
    pub async fn launch(config: SessionConfig) -> HarnessResult<Self> {
        info!(
            "Launching {} (headless: {}, viewport: {}x{})",
            config.browser.as_str(),
            config.headless,
            config.viewport.width,
            config.viewport.height
        );

        let mut driver = DriverProcess::spawn(&config).await?;
        driver
            .call(
                Command::Launch {
                    browser: config.browser,
                    headless: config.headless,
                    viewport: config.viewport.clone(),
                    nav_timeout_ms: config.nav_timeout.as_millis() as u64,
                    action_timeout_ms: config.action_timeout.as_millis() as u64,
                },
                config.startup_timeout,
            )
            .await
            .map_err(|e| match e {
                HarnessError::Driver(reason) => HarnessError::DriverStartup(reason),
                other => other,
            })?;

        Ok(Self {
            driver: Mutex::new(driver),
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Handle to the session's page.
    pub fn page(&self) -> Page<'_> {
        Page { session: self }
    }

    /// Close the browser and stop the driver process.
    pub async fn close(&self) -> HarnessResult<()> {
        debug!("Closing session");
        let mut driver = self.driver.lock().await;
        driver.shutdown().await
    }
}

/// The single page of a session.
pub struct Page<'a> {
    session: &'a Session,
}

// Margin on top of the in-driver timeout before the harness gives up on a
// response entirely (driver hung or dead).
const CALL_MARGIN: Duration = Duration::from_secs(5);

impl Page<'_> {
    async fn run(&self, command: Command, timeout: Duration) -> HarnessResult<serde_json::Value> {
        let mut driver = self.session.driver.lock().await;
        driver.call(command, timeout + CALL_MARGIN).await
    }

    /// Navigate to `url` and wait for the load to settle.
    pub async fn goto(&self, url: &str) -> HarnessResult<()> {
        debug!("goto {}", url);
        self.run(
            Command::Goto {
                url: url.to_string(),
            },
            self.session.config.nav_timeout,
        )
        .await
        .map_err(|e| e.in_navigation(url))?;
        Ok(())
    }

    /// Primary-click the element.
    pub async fn click(&self, locator: &Locator) -> HarnessResult<()> {
        debug!("click {}", locator);
        self.run(
            Command::Click {
                locator: locator.clone(),
                button: MouseButton::Left,
            },
            self.session.config.action_timeout,
        )
        .await
        .map_err(|e| e.in_action("click", locator))?;
        Ok(())
    }

    /// Secondary-click the element (opens context menus).
    pub async fn context_click(&self, locator: &Locator) -> HarnessResult<()> {
        debug!("context-click {}", locator);
        self.run(
            Command::Click {
                locator: locator.clone(),
                button: MouseButton::Right,
            },
            self.session.config.action_timeout,
        )
        .await
        .map_err(|e| e.in_action("context-click", locator))?;
        Ok(())
    }

    /// Replace the element's value with `value`.
    pub async fn fill(&self, locator: &Locator, value: &str) -> HarnessResult<()> {
        debug!("fill {}", locator);
        self.run(
            Command::Fill {
                locator: locator.clone(),
                value: value.to_string(),
            },
            self.session.config.action_timeout,
        )
        .await
        .map_err(|e| e.in_action("fill", locator))?;
        Ok(())
    }

    /// Press a key at the page level.
    pub async fn press(&self, key: &str) -> HarnessResult<()> {
        debug!("press {}", key);
        self.run(
            Command::Press {
                key: key.to_string(),
            },
            self.session.config.action_timeout,
        )
        .await
        .map_err(|e| match e {
            HarnessError::Driver(reason) => HarnessError::Action {
                action: "press",
                locator: format!("key={:?}", key),
                reason,
            },
            other => other,
        })?;
        Ok(())
    }

    /// Block until the page URL matches `url`.
    pub async fn wait_for_url(&self, url: &str) -> HarnessResult<()> {
        debug!("wait for url {}", url);
        let timeout = self.session.config.nav_timeout;
        self.run(
            Command::WaitUrl {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            },
            timeout,
        )
        .await
        .map_err(|e| e.in_navigation(url))?;
        Ok(())
    }

    /// Assert the element becomes visible.
    pub async fn expect_visible(&self, locator: &Locator) -> HarnessResult<()> {
        debug!("expect visible {}", locator);
        let timeout = self.session.config.assert_timeout;
        self.run(
            Command::ExpectVisible {
                locator: locator.clone(),
                timeout_ms: timeout.as_millis() as u64,
            },
            timeout,
        )
        .await
        .map_err(|e| e.in_assertion(format!("{} visible", locator)))?;
        Ok(())
    }

    /// Assert the number of matches settles at `count`.
    pub async fn expect_count(&self, locator: &Locator, count: usize) -> HarnessResult<()> {
        debug!("expect count {} == {}", locator, count);
        let timeout = self.session.config.assert_timeout;
        self.run(
            Command::ExpectCount {
                locator: locator.clone(),
                count,
                timeout_ms: timeout.as_millis() as u64,
            },
            timeout,
        )
        .await
        .map_err(|e| e.in_assertion(format!("{} count == {}", locator, count)))?;
        Ok(())
    }

    /// Write a full-page screenshot to `path`.
    pub async fn screenshot(&self, path: &Path) -> HarnessResult<()> {
        debug!("screenshot -> {}", path.display());
        self.run(
            Command::Screenshot {
                path: path.to_string_lossy().into_owned(),
                full_page: true,
            },
            self.session.config.action_timeout,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.browser, BrowserKind::Chromium);
        assert!(config.headless);
        assert_eq!(config.viewport.width, 1280);
        assert_eq!(config.viewport.height, 720);
        assert_eq!(config.nav_timeout, Duration::from_secs(30));
        assert_eq!(config.action_timeout, Duration::from_secs(15));
        assert_eq!(config.assert_timeout, Duration::from_secs(5));
        assert!(config.node_path.is_none());
    }

    #[test]
    fn browser_kind_names() {
        assert_eq!(BrowserKind::Chromium.as_str(), "chromium");
        assert_eq!(BrowserKind::Firefox.as_str(), "firefox");
        assert_eq!(BrowserKind::Webkit.as_str(), "webkit");
        assert_eq!(BrowserKind::default(), BrowserKind::Chromium);
    }
}
