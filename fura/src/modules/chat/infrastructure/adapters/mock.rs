// 离线模拟适配器
//
// 使用 --offline 启动时使用，不发出任何网络请求

use async_trait::async_trait;

use crate::modules::chat::ports::{
    CompletionError, CompletionPort, CompletionRequest, CompletionResponse, GeneratedImage,
    ImageError, ImagePort, ImageRequest,
};

/// 1x1 透明 PNG
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// 模拟补全适配器：回显最后一条消息
#[derive(Debug, Clone, Default)]
pub struct MockCompletionAdapter;

impl MockCompletionAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionPort for MockCompletionAdapter {
    fn provider_id(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let user_content = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or("");

        Ok(CompletionResponse {
            content: Some(format!(
                "You said: \"{}\"\n\n_This is a simulated reply. Configure an OpenRouter API key to talk to a real model._",
                user_content
            )),
            usage: None,
        })
    }
}

/// 模拟图片适配器：返回占位 PNG
#[derive(Debug, Clone, Default)]
pub struct MockImageAdapter;

impl MockImageAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImagePort for MockImageAdapter {
    fn provider_id(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _request: ImageRequest) -> Result<GeneratedImage, ImageError> {
        Ok(GeneratedImage::new(
            PLACEHOLDER_PNG.to_vec(),
            Some("image/png".to_string()),
        ))
    }
}
