//! Task creation scenarios
//!
//! Both composer entry paths must land a task in the list: the sidebar
//! "Add task" button and the quick-add key. Each scenario leases its own
//! account, runs in its own browser session, and cleans up by deleting the
//! task it created.
//!
//! Live tests: they need Playwright (node + the playwright package),
//! network access to the hosted app, and TODOFLOW_ACCOUNTS /
//! TODOFLOW_PASSWORD. Run with: cargo test -p todoflow-e2e -- --ignored

use todoflow_e2e::{flows, Scenario, SuiteResult};

#[tokio::test]
#[ignore = "requires Playwright, network access, and live accounts"]
async fn adds_task_via_sidebar_button() -> SuiteResult<()> {
    let scenario = Scenario::start("adds_task_via_sidebar_button").await?;
    let page = scenario.page();

    let outcome: SuiteResult<()> = async {
        flows::login(&page, &scenario.config, scenario.account()).await?;
        flows::open_task_composer(&page).await?;
        flows::add_task(&page, "todo1").await?;
        flows::delete_task(&page, "todo1").await?;
        Ok(())
    }
    .await;

    scenario.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Playwright, network access, and live accounts"]
async fn adds_task_via_quick_add_key() -> SuiteResult<()> {
    let scenario = Scenario::start("adds_task_via_quick_add_key").await?;
    let page = scenario.page();

    let outcome: SuiteResult<()> = async {
        flows::login(&page, &scenario.config, scenario.account()).await?;
        flows::quick_add(&page).await?;
        flows::add_task(&page, "todo1").await?;
        flows::delete_task(&page, "todo1").await?;
        Ok(())
    }
    .await;

    scenario.finish(outcome).await
}
