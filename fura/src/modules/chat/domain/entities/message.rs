use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::value_objects::{MessageId, RequestId};

/// 助手消息使用的头像
pub const ASSISTANT_AVATAR: &str = "/fura-avatar.png";

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// 用户消息
    User,
    /// AI 助手消息
    Assistant,
}

impl MessageRole {
    /// 转换为补全接口使用的角色名
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// 消息实体
///
/// 会话中唯一的实体。持久化格式兼容只包含 role/content/avatar 的旧历史记录，
/// 其余字段在缺失时按默认值补齐
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// 消息唯一标识
    #[serde(default)]
    id: MessageId,
    /// 消息角色
    role: MessageRole,
    /// 消息内容（markdown，图片回复以 `![AI Image](...)` 嵌入）
    content: String,
    /// 头像引用（URL 或本地路径）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
    /// 关联请求 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_id: Option<RequestId>,
    /// 创建时间
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl Message {
    /// 创建用户消息
    pub fn new_user(content: impl Into<String>, avatar: Option<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: MessageRole::User,
            content: content.into(),
            avatar,
            request_id: None,
            created_at: Utc::now(),
        }
    }

    /// 创建助手消息
    pub fn new_assistant(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: MessageRole::Assistant,
            content: content.into(),
            avatar: Some(ASSISTANT_AVATAR.to_string()),
            request_id: None,
            created_at: Utc::now(),
        }
    }

    /// 绑定请求 ID
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    // Getters
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn request_id(&self) -> Option<RequestId> {
        self.request_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
