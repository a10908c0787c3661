//! Typed element addressing
//!
//! Locators mirror Playwright's recommended addressing: ARIA role plus
//! accessible name, placeholder text, test-id attribute, or visible text,
//! optionally refined by an `nth` index or a has-text filter. They are
//! serialized verbatim onto the driver wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// ARIA roles the suite addresses elements by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Link,
    Button,
    Textbox,
    Menuitem,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Link => "link",
            Role::Button => "button",
            Role::Textbox => "textbox",
            Role::Menuitem => "menuitem",
        }
    }
}

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    /// ARIA role with accessible name.
    Role { role: Role, name: String },

    /// Input placeholder text.
    Placeholder { text: String },

    /// `data-testid` attribute value.
    TestId { id: String },

    /// Visible text content.
    Text { text: String },
}

/// A selector plus refinements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    #[serde(flatten)]
    pub selector: Selector,

    /// Restrict a multi-match selector to the nth match (0-based).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nth: Option<usize>,

    /// Keep only matches containing this text.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_text: Option<String>,
}

impl Locator {
    pub fn role(role: Role, name: impl Into<String>) -> Self {
        Self::from_selector(Selector::Role {
            role,
            name: name.into(),
        })
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::from_selector(Selector::Placeholder { text: text.into() })
    }

    pub fn test_id(id: impl Into<String>) -> Self {
        Self::from_selector(Selector::TestId { id: id.into() })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::from_selector(Selector::Text { text: text.into() })
    }

    fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            nth: None,
            has_text: None,
        }
    }

    pub fn nth(mut self, n: usize) -> Self {
        self.nth = Some(n);
        self
    }

    pub fn first(self) -> Self {
        self.nth(0)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.has_text = Some(text.into());
        self
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            Selector::Role { role, name } => write!(f, "role={}[name={:?}]", role.as_str(), name)?,
            Selector::Placeholder { text } => write!(f, "placeholder={:?}", text)?,
            Selector::TestId { id } => write!(f, "testid={}", id)?,
            Selector::Text { text } => write!(f, "text={:?}", text)?,
        }
        if let Some(text) = &self.has_text {
            write!(f, " hastext={:?}", text)?;
        }
        if let Some(n) = self.nth {
            write!(f, " nth={}", n)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_locator_wire_shape() {
        let locator = Locator::role(Role::Button, "Add task").first();
        let value = serde_json::to_value(&locator).unwrap();
        assert_eq!(
            value,
            json!({"kind": "role", "role": "button", "name": "Add task", "nth": 0})
        );
    }

    #[test]
    fn filtered_test_id_wire_shape() {
        let locator = Locator::test_id("task-list-item").with_text("todo1");
        let value = serde_json::to_value(&locator).unwrap();
        assert_eq!(
            value,
            json!({"kind": "test_id", "id": "task-list-item", "has_text": "todo1"})
        );
    }

    #[test]
    fn refinements_are_omitted_when_unset() {
        let value = serde_json::to_value(Locator::placeholder("Enter your email...")).unwrap();
        assert_eq!(
            value,
            json!({"kind": "placeholder", "text": "Enter your email..."})
        );
    }

    #[test]
    fn locator_round_trips() {
        let locator = Locator::text("todoUpdated").nth(2);
        let json = serde_json::to_string(&locator).unwrap();
        let back: Locator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, locator);
    }

    #[test]
    fn display_names_the_target() {
        let locator = Locator::role(Role::Menuitem, "Delete");
        assert_eq!(locator.to_string(), "role=menuitem[name=\"Delete\"]");

        let filtered = Locator::test_id("task-list-item").with_text("todo1");
        assert_eq!(
            filtered.to_string(),
            "testid=task-list-item hastext=\"todo1\""
        );
    }
}
