//! Ollama LLM Gateway implementation
//!
//! Non-streaming `POST {base_url}/api/chat` for completions.

use super::error::OllamaError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use steward_application::ports::llm_gateway::{GatewayError, LlmGateway};
use steward_domain::{Message, Model};
use tracing::debug;

/// Default server address
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

/// LLM Gateway implementation for a local Ollama server
pub struct OllamaGateway {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaGateway {
    /// Create a gateway for `base_url`, optionally bounding each request.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, OllamaError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post_chat(&self, model: &Model, messages: &[Message]) -> Result<String, OllamaError> {
        debug!(model = %model, messages = messages.len(), "Calling Ollama chat");

        let request = ChatRequest {
            model: model.as_str(),
            messages,
            stream: false,
        };
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| OllamaError::Decode(e.to_string()))?;
        debug!(model = %model, length = parsed.message.content.len(), "Ollama replied");
        Ok(parsed.message.content)
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    async fn chat(&self, model: &Model, messages: &[Message]) -> Result<String, GatewayError> {
        Ok(self.post_chat(model, messages).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            l.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if raw.len() >= head_end + 4 + length || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn test_chat_sends_non_streaming_request() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"model":"llama3.1","message":{"role":"assistant","content":"[]"},"done":true}"#,
        )
        .await;
        let gateway = OllamaGateway::new(format!("{}/", url), Some(Duration::from_secs(5))).unwrap();

        let reply = gateway
            .chat(
                &Model::new("llama3.1"),
                &[Message::system("be terse"), Message::user("hi")],
            )
            .await
            .unwrap();
        assert_eq!(reply, "[]");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/chat"));
        assert!(request.contains(r#""stream":false"#));
        assert!(request.contains(r#""role":"system""#));
        assert!(request.contains(r#""model":"llama3.1""#));
    }

    #[tokio::test]
    async fn test_missing_model_maps_to_model_not_available() {
        let (url, _server) = serve_once("404 Not Found", r#"{"error":"model 'x' not found"}"#).await;
        let gateway = OllamaGateway::new(url, None).unwrap();

        let err = gateway.chat(&Model::new("x"), &[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::ModelNotAvailable(body) if body.contains("not found")));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let (url, _server) = serve_once("200 OK", "not json").await;
        let gateway = OllamaGateway::new(url, None).unwrap();

        let err = gateway.chat(&Model::new("x"), &[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let gateway = OllamaGateway::new("http://127.0.0.1:1", None).unwrap();
        let err = gateway.chat(&Model::new("x"), &[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }
}
