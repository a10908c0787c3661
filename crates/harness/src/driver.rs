//! Driver subprocess management and the JSON-line protocol
//!
//! The harness does not speak CDP itself. It spawns a small Node driver
//! (embedded below, materialized into a temp dir at spawn) that holds one
//! Playwright browser, context, and page, executes commands arriving as
//! JSON objects on stdin, and answers on stdout. Driver diagnostics on
//! stderr are forwarded to `tracing` at debug level.

use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tracing::{debug, warn};

use crate::error::{HarnessError, HarnessResult};
use crate::locator::Locator;
use crate::session::{BrowserKind, SessionConfig, Viewport};

/// Embedded Node driver script.
pub(crate) const DRIVER_JS: &str = include_str!("driver.js");

/// A request to the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    #[serde(flatten)]
    pub command: Command,
}

/// Commands the driver understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    Launch {
        browser: BrowserKind,
        headless: bool,
        viewport: Viewport,
        nav_timeout_ms: u64,
        action_timeout_ms: u64,
    },
    Goto {
        url: String,
    },
    Click {
        locator: Locator,
        button: MouseButton,
    },
    Fill {
        locator: Locator,
        value: String,
    },
    Press {
        key: String,
    },
    WaitUrl {
        url: String,
        timeout_ms: u64,
    },
    ExpectVisible {
        locator: Locator,
        timeout_ms: u64,
    },
    ExpectCount {
        locator: Locator,
        count: usize,
        timeout_ms: u64,
    },
    Screenshot {
        path: String,
        full_page: bool,
    },
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

/// A response from the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    pub ok: bool,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Handle to a running driver process.
pub struct DriverProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
    // Keeps the materialized driver script alive for the child's lifetime.
    _workdir: TempDir,
}

impl DriverProcess {
    /// Materialize the driver script and spawn `node` on it.
    pub async fn spawn(config: &SessionConfig) -> HarnessResult<Self> {
        check_playwright_installed()?;

        let workdir = tempfile::tempdir()?;
        let script_path = workdir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_JS)?;

        debug!("Spawning driver: node {}", script_path.display());

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path)
            .current_dir(workdir.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(node_path) = &config.node_path {
            cmd.env("NODE_PATH", node_path);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| HarnessError::DriverStartup(format!("Failed to spawn node: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| HarnessError::DriverStartup("driver stdin not piped".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| HarnessError::DriverStartup("driver stdout not piped".to_string()))?;

        // Forward driver diagnostics to tracing.
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: "todoflow_harness::driver", "{}", line);
                }
            });
        }

        let mut process = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 0,
            _workdir: workdir,
        };

        // Startup handshake: the driver reports ready (or a resolution
        // failure for the playwright module) as response id 0.
        match tokio::time::timeout(config.startup_timeout, process.read_response(0)).await {
            Ok(Ok(_)) => Ok(process),
            Ok(Err(HarnessError::Driver(reason))) => Err(HarnessError::DriverStartup(reason)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(HarnessError::DriverStartup(format!(
                "no ready handshake within {:?}",
                config.startup_timeout
            ))),
        }
    }

    /// Send one command and wait for its response.
    pub async fn call(&mut self, command: Command, timeout: Duration) -> HarnessResult<Value> {
        self.next_id += 1;
        let id = self.next_id;
        let request = Request { id, command };

        // Fill values can carry credentials, so the raw request line is
        // never logged.
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;

        match tokio::time::timeout(timeout, self.read_response(id)).await {
            Ok(result) => result,
            Err(_) => Err(HarnessError::Timeout(format!(
                "driver response to request {} ({:?} elapsed)",
                id, timeout
            ))),
        }
    }

    async fn read_response(&mut self, id: u64) -> HarnessResult<Value> {
        while let Some(line) = self.stdout.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response: Response = serde_json::from_str(&line).map_err(|e| {
                HarnessError::Protocol(format!("unparseable driver line {:?}: {}", line, e))
            })?;
            if response.id != id {
                warn!("Discarding stale driver response for request {}", response.id);
                continue;
            }
            return if response.ok {
                Ok(response.value.unwrap_or(Value::Null))
            } else {
                Err(HarnessError::Driver(
                    response.error.unwrap_or_else(|| "unspecified driver error".to_string()),
                ))
            };
        }
        Err(HarnessError::Protocol("driver closed its stdout".to_string()))
    }

    /// Ask the driver to close the browser and exit, then make sure the
    /// process is gone.
    pub async fn shutdown(&mut self) -> HarnessResult<()> {
        let _ = self.call(Command::Close, SHUTDOWN_TIMEOUT).await;

        // SIGTERM first, hard kill as fallback.
        #[cfg(unix)]
        if let Some(pid) = self.child.id() {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok() {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        }

        let _ = self.child.kill().await;
        let _ = self.child.wait().await;
        Ok(())
    }
}

impl Drop for DriverProcess {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
    }
}

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Check that Playwright is reachable through npx.
fn check_playwright_installed() -> HarnessResult<()> {
    let status = std::process::Command::new("npx")
        .args(["playwright", "--version"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        _ => Err(HarnessError::PlaywrightNotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{Locator, Role};
    use serde_json::json;

    #[test]
    fn click_request_wire_shape() {
        let request = Request {
            id: 3,
            command: Command::Click {
                locator: Locator::test_id("task-list-item").with_text("todo1"),
                button: MouseButton::Right,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 3,
                "cmd": "click",
                "locator": {"kind": "test_id", "id": "task-list-item", "has_text": "todo1"},
                "button": "right"
            })
        );
    }

    #[test]
    fn launch_request_wire_shape() {
        let request = Request {
            id: 1,
            command: Command::Launch {
                browser: BrowserKind::Chromium,
                headless: true,
                viewport: Viewport {
                    width: 1280,
                    height: 720,
                },
                nav_timeout_ms: 30_000,
                action_timeout_ms: 15_000,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "cmd": "launch",
                "browser": "chromium",
                "headless": true,
                "viewport": {"width": 1280, "height": 720},
                "nav_timeout_ms": 30_000,
                "action_timeout_ms": 15_000
            })
        );
    }

    #[test]
    fn press_request_wire_shape() {
        let request = Request {
            id: 9,
            command: Command::Press {
                key: "q".to_string(),
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"id": 9, "cmd": "press", "key": "q"}));
    }

    #[test]
    fn error_response_parses() {
        let response: Response =
            serde_json::from_str(r#"{"id":7,"ok":false,"error":"Timeout 15000ms exceeded."}"#)
                .unwrap();
        assert_eq!(response.id, 7);
        assert!(!response.ok);
        assert_eq!(response.error.as_deref(), Some("Timeout 15000ms exceeded."));
        assert!(response.value.is_none());
    }

    #[test]
    fn ready_response_parses() {
        let response: Response =
            serde_json::from_str(r#"{"id":0,"ok":true,"value":"ready"}"#).unwrap();
        assert!(response.ok);
        assert_eq!(response.value, Some(json!("ready")));
    }

    #[test]
    fn driver_script_handles_every_command() {
        for cmd in [
            "launch",
            "goto",
            "click",
            "fill",
            "press",
            "wait_url",
            "expect_visible",
            "expect_count",
            "screenshot",
            "close",
        ] {
            assert!(
                DRIVER_JS.contains(&format!("case '{}'", cmd)),
                "driver script lacks a handler for {}",
                cmd
            );
        }
    }

    #[test]
    fn driver_script_resolves_every_locator_kind() {
        for kind in ["role", "placeholder", "test_id", "text"] {
            assert!(
                DRIVER_JS.contains(&format!("case '{}'", kind)),
                "driver script cannot resolve locator kind {}",
                kind
            );
        }
        // Refinements used by Locator.
        assert!(DRIVER_JS.contains("hasText"));
        assert!(DRIVER_JS.contains("nth"));
    }

    #[test]
    fn role_names_match_the_driver_api() {
        // getByRole takes the role string as-is; keep the serde casing lowercase.
        let value = serde_json::to_value(Role::Menuitem).unwrap();
        assert_eq!(value, json!("menuitem"));
    }
}
