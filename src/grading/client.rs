//! OpenAI 兼容的 chat completions 客户端

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::GradingError;
use crate::config::AiConfig;

const SYSTEM_PROMPT: &str = "You are a Computer Science Professor Assistant grading Python code. You must respond in valid JSON format only.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

pub struct CompletionClient {
    http: Client,
    config: AiConfig,
}

impl CompletionClient {
    pub fn new(config: &AiConfig) -> Result<Self, GradingError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GradingError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// 发送一次请求，返回原始响应体
    pub async fn complete(&self, prompt: &str) -> Result<String, GradingError> {
        if !self.is_configured() {
            return Err(GradingError::NotConfigured);
        }

        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        let mut request = self
            .http
            .post(self.config.endpoint.trim())
            .bearer_auth(self.config.api_key.trim())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);
        if let Some(referer) = &self.config.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.app_title {
            request = request.header("X-Title", title);
        }

        let response = request.send().await.map_err(classify_error)?;
        let status = response.status();
        let text = response.text().await.map_err(classify_error)?;
        debug!("AI endpoint responded with status {status}");

        if !status.is_success() {
            return Err(GradingError::Status {
                status: status.as_u16(),
                body: truncate(&text, 200),
            });
        }

        Ok(text)
    }
}

fn classify_error(err: reqwest::Error) -> GradingError {
    if err.is_timeout() {
        GradingError::Timeout
    } else {
        GradingError::Network(err.to_string())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(endpoint: String) -> AiConfig {
        AiConfig {
            endpoint,
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            request_timeout_secs: 1,
            ..AiConfig::default()
        }
    }

    #[tokio::test]
    async fn test_complete_sends_chat_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "max_tokens": 500,
                "stream": false,
                "messages": [{"role": "system"}, {"role": "user", "content": "grade me"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"choices\":[]}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CompletionClient::new(&config_for(mock_server.uri())).unwrap();
        let body = client.complete("grade me").await.unwrap();
        assert_eq!(body, "{\"choices\":[]}");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CompletionClient::new(&config_for(mock_server.uri())).unwrap();
        match client.complete("x").await {
            Err(GradingError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let client = CompletionClient::new(&config_for(mock_server.uri())).unwrap();
        assert!(matches!(client.complete("x").await, Err(GradingError::Timeout)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // 绑定后立即释放端口，确保无人监听
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CompletionClient::new(&config_for(format!("http://{addr}"))).unwrap();
        assert!(matches!(client.complete("x").await, Err(GradingError::Network(_))));
    }

    #[tokio::test]
    async fn test_not_configured() {
        let client = CompletionClient::new(&AiConfig::default()).unwrap();
        assert!(!client.is_configured());
        assert!(matches!(client.complete("x").await, Err(GradingError::NotConfigured)));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("评分服务", 2), "评分...");
    }
}
