//! Per-scenario bootstrap and teardown
//!
//! A `Scenario` bundles everything one live test needs: the suite
//! configuration, an exclusively leased account, and an isolated browser
//! session. On the way out it captures a failure screenshot before the
//! session closes. Cleanup of tasks left behind by a failing scenario is
//! best-effort only; the external account may keep the task.

use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use chrono::Utc;
use once_cell::sync::OnceCell;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use todoflow_harness::{Page, Session, SessionConfig};

use crate::config::SuiteConfig;
use crate::error::{SuiteError, SuiteResult};
use crate::fixtures::{Account, AccountLease, AccountPool};

static INIT: Once = Once::new();
static POOL: OnceCell<AccountPool> = OnceCell::new();

/// Install the tracing subscriber once per test process.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("info".parse().expect("static directive")),
            )
            .with_test_writer()
            .try_init();
    });
}

fn pool() -> SuiteResult<&'static AccountPool> {
    if let Some(pool) = POOL.get() {
        return Ok(pool);
    }
    let pool = AccountPool::from_env()?;
    Ok(POOL.get_or_init(|| pool))
}

/// One live scenario's worth of state.
pub struct Scenario {
    pub config: SuiteConfig,
    name: String,
    account: AccountLease,
    session: Session,
}

impl Scenario {
    /// Lease an account, run the reachability preflight, and launch an
    /// isolated browser session.
    pub async fn start(name: &str) -> SuiteResult<Self> {
        init_tracing();

        let config = SuiteConfig::from_env();
        if config.preflight {
            preflight(&config).await?;
        }

        let account = pool()?.lease().await;
        let session = Session::launch(SessionConfig::from_env()).await?;
        info!("Scenario {} starting as {}", name, account.email);

        Ok(Self {
            config,
            name: name.to_string(),
            account,
            session,
        })
    }

    pub fn page(&self) -> Page<'_> {
        self.session.page()
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Close the session, capturing a screenshot first when the scenario
    /// failed.
    pub async fn finish(&self, outcome: SuiteResult<()>) -> SuiteResult<()> {
        if let Err(err) = &outcome {
            error!("Scenario {} failed: {}", self.name, err);
            match self.capture_failure().await {
                Ok(path) => info!("Failure screenshot: {}", path.display()),
                Err(shot_err) => error!("Could not capture failure screenshot: {}", shot_err),
            }
        }
        self.session.close().await?;
        outcome
    }

    async fn capture_failure(&self) -> SuiteResult<PathBuf> {
        std::fs::create_dir_all(&self.config.artifact_dir)?;
        let path = self
            .config
            .artifact_dir
            .join(failure_artifact_name(&self.name, Utc::now()));
        self.page().screenshot(&path).await?;
        Ok(path)
    }
}

fn failure_artifact_name(scenario: &str, at: chrono::DateTime<Utc>) -> String {
    format!("{}-{}.png", scenario, at.format("%Y%m%dT%H%M%S%3fZ"))
}

/// Reachability preflight against the public entry page, run before any
/// browser is launched.
async fn preflight(config: &SuiteConfig) -> SuiteResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    match client.get(&config.entry_url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => Err(SuiteError::Unreachable {
            url: config.entry_url.clone(),
            reason: format!("status {}", resp.status()),
        }),
        Err(e) => Err(SuiteError::Unreachable {
            url: config.entry_url.clone(),
            reason: e.to_string(),
        }),
    }
}
