use async_trait::async_trait;
use thiserror::Error;

use crate::modules::chat::domain::RequestId;

/// 图片生成错误类型
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Empty image payload")]
    EmptyPayload,

    #[error("Storage error: {0}")]
    StorageError(String),
}

/// 图片生成请求
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub request_id: Option<RequestId>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }
}

/// 生成的图片（原始二进制）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    /// 响应头中的 Content-Type
    pub content_type: Option<String>,
}

impl GeneratedImage {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
        }
    }

    /// 推断文件扩展名：优先看文件头，其次看 Content-Type
    pub fn extension(&self) -> &'static str {
        if self.bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            return "png";
        }
        if self.bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return "jpg";
        }
        if self.bytes.len() >= 12 && &self.bytes[0..4] == b"RIFF" && &self.bytes[8..12] == b"WEBP"
        {
            return "webp";
        }
        if self.bytes.starts_with(b"GIF8") {
            return "gif";
        }
        match self.content_type.as_deref() {
            Some("image/jpeg") => "jpg",
            Some("image/webp") => "webp",
            Some("image/gif") => "gif",
            _ => "png",
        }
    }
}

/// 图片生成端口
#[async_trait]
pub trait ImagePort: Send + Sync {
    fn provider_id(&self) -> &str;

    async fn generate(&self, request: ImageRequest) -> Result<GeneratedImage, ImageError>;
}
