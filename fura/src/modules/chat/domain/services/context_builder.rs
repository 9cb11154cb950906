use serde::{Deserialize, Serialize};

use super::super::entities::Message;

/// 发送给补全接口的单条消息（只有角色和内容）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatTurn {
    fn from(message: &Message) -> Self {
        Self::new(message.role().as_str(), message.content())
    }
}

/// 上下文构建器
///
/// 领域服务：把整个消息序列投影为补全请求的上下文。
/// 不截断、不注入系统提示，头像等字段被丢弃
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, history: &[Message]) -> Vec<ChatTurn> {
        history.iter().map(ChatTurn::from).collect()
    }
}
