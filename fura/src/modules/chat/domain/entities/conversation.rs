use super::message::Message;

/// 首次启动时的问候语
pub const GREETING: &str = "Hello! I am Fura AI, your smart assistant.";

/// 会话消息序列
///
/// 只追加、有序；没有删除和编辑操作
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// 仅包含问候语的默认会话
    pub fn greeting() -> Self {
        Self {
            messages: vec![Message::new_assistant(GREETING)],
        }
    }

    /// 从已持久化的消息恢复
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
