//! Todoflow E2E suite
//!
//! Browser-driven scenarios against the hosted Todoist web app: login,
//! task creation (sidebar button and quick-add key), deletion, and editing
//! (context menu and detail view). The suite owns no product logic; it
//! composes typed UI flows over the `todoflow-harness` driver.
//!
//! Live scenarios live under `tests/` and are `#[ignore]`d: they need
//! Playwright (node + the playwright package), network access, and real
//! accounts via TODOFLOW_ACCOUNTS / TODOFLOW_PASSWORD. Run them with
//! `cargo test -p todoflow-e2e -- --ignored`.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod flows;
pub mod scenario;

pub use config::SuiteConfig;
pub use error::{SuiteError, SuiteResult};
pub use fixtures::{Account, AccountLease, AccountPool};
pub use scenario::Scenario;
