//! UI flows against the hosted app
//!
//! Each flow is a strictly sequential series of UI actions composed by the
//! scenarios. Flows locate elements the way the app exposes them: ARIA
//! roles and names, input placeholders, and the task-list-item test id.

use tracing::info;

use todoflow_harness::{Locator, Page, Role};

use crate::config::SuiteConfig;
use crate::error::SuiteResult;
use crate::fixtures::Account;

/// The task-list entry carrying `title`.
fn task_item(title: &str) -> Locator {
    Locator::test_id("task-list-item").with_text(title)
}

/// Drive the login flow from the public entry page and block until the
/// authenticated landing view is reached.
pub async fn login(page: &Page<'_>, config: &SuiteConfig, account: &Account) -> SuiteResult<()> {
    info!("Logging in as {}", account.email);
    page.goto(&config.entry_url).await?;
    page.click(&Locator::role(Role::Link, "Log in")).await?;
    page.fill(&Locator::placeholder("Enter your email..."), &account.email)
        .await?;
    page.fill(
        &Locator::placeholder("Enter your password..."),
        &account.password,
    )
    .await?;
    page.click(&Locator::role(Role::Button, "Log in")).await?;
    page.wait_for_url(&config.landing_url).await?;
    Ok(())
}

/// Open the task composer via the sidebar "Add task" button.
pub async fn open_task_composer(page: &Page<'_>) -> SuiteResult<()> {
    page.click(&Locator::role(Role::Button, "Add task").first())
        .await?;
    Ok(())
}

/// Open the task composer via the quick-add shortcut.
pub async fn quick_add(page: &Page<'_>) -> SuiteResult<()> {
    page.press("q").await?;
    Ok(())
}

/// Fill the composer with `title`, submit, and wait for the title to show
/// up in the task list.
pub async fn add_task(page: &Page<'_>, title: &str) -> SuiteResult<()> {
    info!("Adding task {:?}", title);
    page.fill(&Locator::role(Role::Textbox, "Task name"), title)
        .await?;
    page.click(&Locator::role(Role::Button, "Add task")).await?;
    page.expect_visible(&Locator::text(title)).await?;
    Ok(())
}

/// Delete the task carrying `title` through its context menu and confirm
/// the title no longer matches anything.
pub async fn delete_task(page: &Page<'_>, title: &str) -> SuiteResult<()> {
    info!("Deleting task {:?}", title);
    page.context_click(&task_item(title)).await?;
    page.click(&Locator::role(Role::Menuitem, "Delete")).await?;
    page.click(&Locator::role(Role::Button, "Delete")).await?;
    page.expect_count(&Locator::text(title), 0).await?;
    Ok(())
}

/// Rename a task through its context menu.
pub async fn rename_task(page: &Page<'_>, old_title: &str, new_title: &str) -> SuiteResult<()> {
    info!("Renaming task {:?} -> {:?} (context menu)", old_title, new_title);
    page.context_click(&task_item(old_title)).await?;
    page.click(&Locator::role(Role::Menuitem, "Edit")).await?;
    page.fill(&Locator::role(Role::Textbox, "Task name"), new_title)
        .await?;
    page.click(&Locator::role(Role::Button, "Save")).await?;
    page.expect_visible(&Locator::text(new_title)).await?;
    page.expect_count(&Locator::text(old_title), 0).await?;
    Ok(())
}

/// Rename a task from its detail view.
pub async fn rename_task_inline(
    page: &Page<'_>,
    old_title: &str,
    new_title: &str,
) -> SuiteResult<()> {
    info!("Renaming task {:?} -> {:?} (detail view)", old_title, new_title);
    page.click(&task_item(old_title)).await?;

    // The first click only focuses the title control; the second one puts
    // it into edit mode.
    let title_control = Locator::role(Role::Button, "Task name");
    page.click(&title_control).await?;
    page.click(&title_control).await?;

    page.fill(&Locator::role(Role::Textbox, "Task name"), new_title)
        .await?;
    page.click(&Locator::role(Role::Button, "Save")).await?;
    page.click(&Locator::role(Role::Button, "Close task")).await?;
    page.expect_visible(&Locator::text(new_title)).await?;
    page.expect_count(&Locator::text(old_title), 0).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_item_targets_by_title() {
        let value = serde_json::to_value(task_item("todo1")).unwrap();
        assert_eq!(
            value,
            json!({"kind": "test_id", "id": "task-list-item", "has_text": "todo1"})
        );
    }
}
