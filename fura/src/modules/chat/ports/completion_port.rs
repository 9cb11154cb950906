use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::chat::domain::{ChatTurn, RequestId};

/// 文本补全错误类型
///
/// 对应三类失败：传输失败、非成功状态码、响应格式异常
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// 补全请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// 完整的消息序列（仅角色和内容）
    pub messages: Vec<ChatTurn>,
    /// 模型 ID
    pub model: String,
    /// 关联请求 ID（用于日志）
    pub request_id: Option<RequestId>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatTurn>, model: impl Into<String>) -> Self {
        Self {
            messages,
            model: model.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }
}

/// 补全响应
///
/// `content` 为 `choices[0].message.content`，路径缺失时为 None
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub content: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// Token 使用统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// 文本补全端口
#[async_trait]
pub trait CompletionPort: Send + Sync {
    /// 获取提供商 ID
    fn provider_id(&self) -> &str;

    /// 默认模型
    fn default_model(&self) -> &str;

    /// 单次补全请求，不重试
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, CompletionError>;
}
