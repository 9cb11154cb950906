/// 补全结果缺失时的兜底回复
pub const NO_RESPONSE_REPLY: &str = "No response received.";
/// 文本请求失败时的回复
pub const TEXT_FAILURE_REPLY: &str = "Error: Failed to get reply.";
/// 图片生成失败时的回复
pub const IMAGE_FAILURE_REPLY: &str = "Image generation failed.";

/// 回复内容组装
///
/// 所有失败类型（网络、状态码、响应格式）都折叠为同一条固定文本
#[derive(Debug, Clone, Default)]
pub struct ReplyComposer;

impl ReplyComposer {
    pub fn new() -> Self {
        Self
    }

    /// 补全成功：取首个候选内容，缺失或为空时使用兜底文本
    pub fn text_reply(&self, content: Option<String>) -> String {
        match content {
            Some(text) if !text.is_empty() => text,
            _ => NO_RESPONSE_REPLY.to_string(),
        }
    }

    pub fn text_failure(&self) -> String {
        TEXT_FAILURE_REPLY.to_string()
    }

    /// 图片回复以 markdown 图片语法嵌入引用
    pub fn image_reply(&self, reference: &str) -> String {
        format!("![AI Image]({})", reference)
    }

    pub fn image_failure(&self) -> String {
        IMAGE_FAILURE_REPLY.to_string()
    }
}
