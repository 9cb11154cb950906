use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::modules::chat::domain::ChatTurn;
use crate::modules::chat::ports::{
    CompletionError, CompletionPort, CompletionRequest, CompletionResponse, TokenUsage,
};

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "mistralai/mixtral-8x7b-instruct";

/// OpenRouter 适配器配置
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: OPENROUTER_BASE_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            timeout_secs: 60,
        }
    }
}

/// OpenRouter chat-completions 适配器（OpenAI 兼容格式）
pub struct OpenRouterAdapter {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterAdapter {
    /// 创建新的 OpenRouter 适配器
    pub fn new(config: OpenRouterConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取 API URL
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// 转换为请求格式，只携带角色和内容
    fn to_wire_request(request: &CompletionRequest) -> WireRequest<'_> {
        WireRequest {
            model: &request.model,
            messages: &request.messages,
        }
    }

    /// 取 `choices[0].message.content`，任一层缺失即为 None
    fn first_candidate(response: WireResponse) -> CompletionResponse {
        let content = response
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);

        CompletionResponse {
            content,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        }
    }
}

#[async_trait]
impl CompletionPort for OpenRouterAdapter {
    fn provider_id(&self) -> &str {
        "openrouter"
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let wire_request = Self::to_wire_request(&request);

        debug!(
            request_id = ?request.request_id,
            model = %wire_request.model,
            messages = wire_request.messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| CompletionError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Completion API error: {} - {}", status, error_text);

            if status.as_u16() == 401 {
                return Err(CompletionError::AuthenticationError(
                    "Invalid API key".to_string(),
                ));
            }

            return Err(CompletionError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CompletionError::NetworkError(e.to_string()))?;

        let wire_response: WireResponse = serde_json::from_slice(&body)
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        Ok(Self::first_candidate(wire_response))
    }
}

// chat-completions 请求/响应类型定义

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Option<Vec<WireChoice>>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    #[serde(default)]
    message: Option<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter_for(server: &MockServer) -> OpenRouterAdapter {
        OpenRouterAdapter::new(OpenRouterConfig {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
            ..OpenRouterConfig::default()
        })
        .unwrap()
    }

    fn hello_request() -> CompletionRequest {
        CompletionRequest::new(
            vec![
                ChatTurn::new("assistant", "Hello! I am Fura AI, your smart assistant."),
                ChatTurn::new("user", "hello"),
            ],
            DEFAULT_COMPLETION_MODEL,
        )
    }

    #[tokio::test]
    async fn test_complete_sends_model_and_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(json!({
                "model": "mistralai/mixtral-8x7b-instruct",
                "messages": [
                    {"role": "assistant", "content": "Hello! I am Fura AI, your smart assistant."},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "Hi there"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = adapter_for(&server).complete(hello_request()).await.unwrap();
        assert_eq!(response.content.as_deref(), Some("Hi there"));
        assert!(response.usage.is_none());
    }

    #[tokio::test]
    async fn test_missing_choices_yields_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x"})))
            .mount(&server)
            .await;

        let response = adapter_for(&server).complete(hello_request()).await.unwrap();
        assert!(response.content.is_none());
    }

    #[tokio::test]
    async fn test_empty_choices_yields_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let response = adapter_for(&server).complete(hello_request()).await.unwrap();
        assert!(response.content.is_none());
    }

    #[tokio::test]
    async fn test_usage_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
            })))
            .mount(&server)
            .await;

        let response = adapter_for(&server).complete(hello_request()).await.unwrap();
        assert_eq!(response.usage.unwrap().total_tokens, 4);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("no key"))
            .mount(&server)
            .await;

        let err = adapter_for(&server).complete(hello_request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::AuthenticationError(_)));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = adapter_for(&server).complete(hello_request()).await.unwrap_err();
        match err {
            CompletionError::ApiError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = adapter_for(&server).complete(hello_request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let adapter = OpenRouterAdapter::new(OpenRouterConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..OpenRouterConfig::default()
        })
        .unwrap();

        let err = adapter.complete(hello_request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::NetworkError(_)));
    }
}
