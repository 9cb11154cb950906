// 测试用的可控端口实现

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::modules::chat::ports::{
    CompletionError, CompletionPort, CompletionRequest, CompletionResponse, GeneratedImage,
    IdentityPort, ImageError, ImagePort, ImageRequest, UserProfile,
};

pub const TEST_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x01];

/// 预设的补全结果
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// `choices[0].message.content`
    Content(Option<String>),
    /// 回显最后一条消息：`echo: <content>`
    Echo,
    /// 传输失败
    NetworkFailure,
    /// 非成功状态码
    ApiFailure(u16),
}

/// 可编排的补全端口
///
/// 设置 gate 后每个请求都要等到测试释放一个许可才返回
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<ScriptedReply>>,
    fallback: ScriptedReply,
    requests: Mutex<Vec<CompletionRequest>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedCompletion {
    pub fn always(reply: ScriptedReply) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: reply,
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn gated(reply: ScriptedReply, gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::always(reply)
        }
    }

    pub fn then(self, reply: ScriptedReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionPort for ScriptedCompletion {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            ScriptedReply::Content(content) => Ok(CompletionResponse {
                content,
                usage: None,
            }),
            ScriptedReply::Echo => Ok(CompletionResponse {
                content: request
                    .messages
                    .last()
                    .map(|m| format!("echo: {}", m.content)),
                usage: None,
            }),
            ScriptedReply::NetworkFailure => {
                Err(CompletionError::NetworkError("connection refused".to_string()))
            }
            ScriptedReply::ApiFailure(status) => Err(CompletionError::ApiError {
                status,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

/// 可编排的图片端口
pub struct ScriptedImage {
    succeed: bool,
    requests: Mutex<Vec<ImageRequest>>,
}

impl ScriptedImage {
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImagePort for ScriptedImage {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: ImageRequest) -> Result<GeneratedImage, ImageError> {
        self.requests.lock().unwrap().push(request);
        if self.succeed {
            Ok(GeneratedImage::new(
                TEST_PNG.to_vec(),
                Some("image/png".to_string()),
            ))
        } else {
            Err(ImageError::ApiError {
                status: 503,
                message: "Model is currently loading".to_string(),
            })
        }
    }
}

/// 固定用户
pub struct TestIdentity;

impl IdentityPort for TestIdentity {
    fn current_user(&self) -> UserProfile {
        UserProfile {
            display_name: Some("Ada".to_string()),
            avatar_url: Some("https://img.example/ada.png".to_string()),
        }
    }
}
