//! Todoflow browser harness
//!
//! Rust-controlled Playwright automation: the harness spawns a small Node
//! driver that holds one browser, context, and page, and speaks a JSON-line
//! protocol with it over stdin/stdout.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Session (Rust)                      │
//! │   Page ── click / fill / press / goto / expect_* ──┐    │
//! │                                                    │    │
//! │   DriverProcess ── {id, cmd, ...}\n ── stdin ──────┤    │
//! │                 ◄─ {id, ok, ...}\n ─── stdout ─────┘    │
//! ├─────────────────────────────────────────────────────────┤
//! │              driver.js (Node + Playwright)              │
//! │        one browser · one context · one page             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! One session per test scenario; sessions share nothing.

pub mod driver;
pub mod error;
pub mod locator;
pub mod session;

pub use error::{HarnessError, HarnessResult};
pub use locator::{Locator, Role, Selector};
pub use session::{BrowserKind, Page, Session, SessionConfig, Viewport};
