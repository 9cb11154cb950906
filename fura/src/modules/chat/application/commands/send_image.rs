use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::super::{ApplicationError, ChatSession, CommandHandler};
use crate::modules::chat::domain::{
    ChatDomainEvent, Message, ReplyComposer, RequestId, RequestKind,
};
use crate::modules::chat::ports::{ImageError, ImagePort, ImageRequest, ImageStore};

/// 图片生成命令
#[derive(Debug, Clone)]
pub struct SendImageCommand {
    /// 已去掉 `draw:` 前缀的提示词
    pub prompt: String,
}

impl SendImageCommand {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// 图片生成响应
#[derive(Debug, Clone)]
pub struct SendImageResponse {
    pub request_id: RequestId,
    /// 助手回复（图片 markdown 或固定失败文本）
    pub assistant_message: Message,
    /// 图片在存储中的引用
    pub image_reference: Option<String>,
}

/// 图片生成命令处理器
///
/// 不追加用户消息，只追加一条助手回复
#[derive(Clone)]
pub struct SendImageHandler {
    session: Arc<ChatSession>,
    image_port: Arc<dyn ImagePort>,
    image_store: Arc<dyn ImageStore>,
    reply_composer: ReplyComposer,
}

impl SendImageHandler {
    pub fn new(
        session: Arc<ChatSession>,
        image_port: Arc<dyn ImagePort>,
        image_store: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            session,
            image_port,
            image_store,
            reply_composer: ReplyComposer::new(),
        }
    }

    /// 生成并保存图片，返回存储引用
    async fn generate_and_store(&self, request: ImageRequest) -> Result<String, ImageError> {
        let image = self.image_port.generate(request).await?;
        self.image_store
            .put(&image)
            .await
            .map_err(|e| ImageError::StorageError(e.to_string()))
    }
}

#[async_trait]
impl CommandHandler<SendImageCommand, Option<SendImageResponse>> for SendImageHandler {
    async fn handle(
        &self,
        command: SendImageCommand,
    ) -> Result<Option<SendImageResponse>, ApplicationError> {
        let prompt = command.prompt.trim();
        if prompt.is_empty() {
            debug!("Ignoring blank image prompt");
            return Ok(None);
        }

        let request_id = RequestId::new();
        let _busy = self.session.begin_request();
        self.session.clear_draft().await;

        info!(%request_id, "Dispatching image generation");

        let request = ImageRequest::new(prompt).with_request_id(request_id);
        let (content, image_reference) = match self.generate_and_store(request).await {
            Ok(reference) => (self.reply_composer.image_reply(&reference), Some(reference)),
            Err(e) => {
                error!(%request_id, "Image generation failed: {}", e);
                self.session.publish(ChatDomainEvent::request_failed(
                    request_id,
                    RequestKind::Image,
                    e.to_string(),
                ));
                (self.reply_composer.image_failure(), None)
            }
        };

        let assistant_message = Message::new_assistant(content).with_request_id(request_id);
        self.session.append(assistant_message.clone()).await;

        Ok(Some(SendImageResponse {
            request_id,
            assistant_message,
            image_reference,
        }))
    }
}
