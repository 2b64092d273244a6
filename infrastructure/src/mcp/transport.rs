//! Per-call stdio transport to MCP backends.
//!
//! Every [`BackendTransport::call_tool`] spawns the backend's launcher,
//! performs the handshake, issues one `tools/call`, and tears the process
//! down again. Nothing is kept between calls.
//!
//! ```text
//! steward                          backend process
//!   │── initialize ──────────────────▶│
//!   │◀──────────────── capabilities ──│
//!   │── notifications/initialized ───▶│
//!   │── tools/call ──────────────────▶│
//!   │◀─────────────── CallToolResult ─│
//!   └── kill ─────────────────────────┘
//! ```
//!
//! stdout carries protocol frames only. stderr is collected separately and is
//! surfaced only when the round trip fails.

use super::error::{McpError, Result};
use super::protocol::{
    CallToolParams, CallToolResult, InitializeParams, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;
use steward_application::ports::backend_transport::{BackendTransport, TransportError};
use steward_domain::util::truncate_str;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

/// How to launch one backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendCommand {
    /// Executable or launcher script
    pub command: String,
    pub args: Vec<String>,
    /// Extra environment variables (API keys and the like)
    pub env: HashMap<String, String>,
}

impl BackendCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Line-framed JSON-RPC over a child's stdin/stdout
struct StdioSession {
    writer: ChildStdin,
    reader: Lines<BufReader<ChildStdout>>,
}

impl StdioSession {
    async fn send_line(&mut self, json: &str) -> Result<()> {
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn notify(&mut self, notification: &JsonRpcNotification) -> Result<()> {
        let json = serde_json::to_string(notification)?;
        self.send_line(&json).await
    }

    /// Send a request and wait for the response with the same id.
    async fn request(&mut self, request: &JsonRpcRequest) -> Result<serde_json::Value> {
        let json = serde_json::to_string(request)?;
        debug!(method = %request.method, id = request.id, "Sending backend request");
        self.send_line(&json).await?;

        loop {
            let line = self
                .reader
                .next_line()
                .await?
                .ok_or(McpError::TransportClosed)?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let response: JsonRpcResponse = match serde_json::from_str(trimmed) {
                Ok(response) => response,
                Err(_) => {
                    debug!(line = truncate_str(trimmed, 200), "Skipping non-JSON backend output");
                    continue;
                }
            };
            // Notifications and server-initiated requests are not ours.
            if response.id != Some(request.id) {
                continue;
            }

            if let Some(error) = response.error {
                return Err(McpError::RpcError {
                    code: error.code,
                    message: error.message,
                });
            }
            return response.result.ok_or_else(|| {
                McpError::UnexpectedResponse(format!("no result for '{}'", request.method))
            });
        }
    }
}

/// [`BackendTransport`] that launches a fresh process per call
pub struct StdioBackendTransport {
    backends: HashMap<String, BackendCommand>,
    timeout: Option<Duration>,
}

impl StdioBackendTransport {
    pub fn new(backends: HashMap<String, BackendCommand>) -> Self {
        Self {
            backends,
            timeout: None,
        }
    }

    /// Bound each whole round trip, spawn included
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn build_command(spec: &BackendCommand) -> Command {
        let mut cmd = Command::new(&spec.command);
        cmd.args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Linux: request kernel to send SIGTERM to child when parent dies.
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        cmd
    }

    async fn exchange(
        session: &mut StdioSession,
        tool_name: &str,
        arguments: serde_json::Value,
    ) -> Result<String> {
        let init = JsonRpcRequest::new(
            "initialize",
            Some(serde_json::to_value(InitializeParams::default())?),
        );
        session.request(&init).await?;
        session
            .notify(&JsonRpcNotification::new("notifications/initialized"))
            .await?;

        let params = CallToolParams {
            name: tool_name.to_string(),
            arguments,
        };
        let call = JsonRpcRequest::new("tools/call", Some(serde_json::to_value(params)?));
        let result: CallToolResult = serde_json::from_value(session.request(&call).await?)?;

        let text = result.text();
        if result.is_error {
            return Err(McpError::ToolFailed(text));
        }
        Ok(text)
    }

    async fn round_trip(
        &self,
        spec: &BackendCommand,
        tool_name: &str,
        arguments: serde_json::Value,
    ) -> (Result<String>, String) {
        let mut child = match Self::build_command(spec).spawn() {
            Ok(child) => child,
            Err(e) => return (Err(McpError::SpawnError(e)), String::new()),
        };

        let (Some(stdin), Some(stdout), Some(mut stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            let _ = child.start_kill();
            return (
                Err(McpError::SpawnError(std::io::Error::other(
                    "failed to capture backend stdio",
                ))),
                String::new(),
            );
        };

        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let mut session = StdioSession {
            writer: stdin,
            reader: BufReader::new(stdout).lines(),
        };
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, Self::exchange(&mut session, tool_name, arguments))
                .await
                .unwrap_or(Err(McpError::Timeout)),
            None => Self::exchange(&mut session, tool_name, arguments).await,
        };

        drop(session);
        let _ = child.start_kill();
        let _ = child.wait().await;
        let stderr_text = stderr_task.await.unwrap_or_default();
        (outcome, stderr_text)
    }
}

#[async_trait]
impl BackendTransport for StdioBackendTransport {
    async fn call_tool(
        &self,
        backend: &str,
        tool_name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<String, TransportError> {
        let spec = self
            .backends
            .get(backend)
            .ok_or_else(|| TransportError::UnknownBackend(backend.to_string()))?;

        info!(backend, tool = tool_name, "Calling backend tool");
        let (outcome, stderr) = self.round_trip(spec, tool_name, arguments).await;
        let stderr = stderr.trim();

        outcome.map_err(|e| {
            warn!(backend, tool = tool_name, error = %e, "Backend call failed");
            match e {
                McpError::SpawnError(io) => TransportError::Spawn {
                    backend: backend.to_string(),
                    reason: io.to_string(),
                },
                McpError::Timeout => TransportError::Timeout(backend.to_string()),
                McpError::ToolFailed(text) => TransportError::Remote(text),
                _ if !stderr.is_empty() => TransportError::Remote(stderr.to_string()),
                other => TransportError::Protocol(other.to_string()),
            }
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// Answers the handshake and one tools/call, echoing request ids.
    const FAKE_SERVER: &str = r#"
reply_id() { printf '%s' "$1" | sed 's/.*"id":\([0-9]*\).*/\1/'; }
read -r line
id=$(reply_id "$line")
printf '{"jsonrpc":"2.0","id":%s,"result":{"protocolVersion":"2024-11-05","capabilities":{}}}\n' "$id"
read -r line
read -r line
id=$(reply_id "$line")
echo "fake backend ready" >&2
printf '{"jsonrpc":"2.0","method":"notifications/message","params":{}}\n'
printf '{"jsonrpc":"2.0","id":%s,"result":{"content":[{"type":"text","text":"web-1 running"}],"isError":false}}\n' "$id"
"#;

    fn transport(script: &str) -> StdioBackendTransport {
        let backends = HashMap::from([(
            "docker".to_string(),
            BackendCommand::new("sh").with_args(["-c", script]),
        )]);
        StdioBackendTransport::new(backends).with_timeout(Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_round_trip_returns_text_content() {
        let output = transport(FAKE_SERVER)
            .call_tool("docker", "list_containers", serde_json::json!({"all": false}))
            .await
            .unwrap();
        assert_eq!(output, "web-1 running");
    }

    #[tokio::test]
    async fn test_stderr_surfaces_on_failure() {
        let script = "read -r line; echo 'BRAVE_API_KEY is not set' >&2; exit 1";
        let err = transport(script)
            .call_tool("docker", "list_containers", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(&err, TransportError::Remote(msg) if msg == "BRAVE_API_KEY is not set"));
    }

    #[tokio::test]
    async fn test_tool_error_flag_is_remote_error() {
        let script = r#"
reply_id() { printf '%s' "$1" | sed 's/.*"id":\([0-9]*\).*/\1/'; }
read -r line
printf '{"jsonrpc":"2.0","id":%s,"result":{}}\n' "$(reply_id "$line")"
read -r line
read -r line
printf '{"jsonrpc":"2.0","id":%s,"result":{"content":[{"type":"text","text":"no such container"}],"isError":true}}\n' "$(reply_id "$line")"
"#;
        let err = transport(script)
            .call_tool("docker", "inspect_container", serde_json::json!({"container_id": "x"}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no such container");
    }

    #[tokio::test]
    async fn test_unknown_backend() {
        let err = transport(FAKE_SERVER)
            .call_tool("sqlite", "query_database", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::UnknownBackend(name) if name == "sqlite"));
    }

    #[tokio::test]
    async fn test_missing_launcher_is_spawn_error() {
        let backends = HashMap::from([(
            "youtube".to_string(),
            BackendCommand::new("/nonexistent/steward-launcher"),
        )]);
        let err = StdioBackendTransport::new(backends)
            .call_tool("youtube", "get_transcript", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Spawn { .. }));
    }
}
