use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::chat::{Message, MessageRole, RequestId, UserProfile};

/// 助手显示名
pub const ASSISTANT_DISPLAY_NAME: &str = "Fura";

/// 一条可显示的聊天记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLine {
    pub author: String,
    pub role: MessageRole,
    pub content: String,
    pub avatar: Option<String>,
    pub request_id: Option<RequestId>,
    pub created_at: DateTime<Utc>,
}

impl ChatLine {
    /// 用户消息显示当前身份名（未登录为 "You"），助手消息显示 "Fura"
    pub fn from_message(message: &Message, user: &UserProfile) -> Self {
        let author = match message.role() {
            MessageRole::User => user.display_name_or_default().to_string(),
            MessageRole::Assistant => ASSISTANT_DISPLAY_NAME.to_string(),
        };

        Self {
            author,
            role: message.role(),
            content: message.content().to_string(),
            avatar: message.avatar().map(str::to_string),
            request_id: message.request_id(),
            created_at: message.created_at(),
        }
    }

    pub fn render(&self) -> String {
        format!("{}: {}", self.author, self.content)
    }
}
