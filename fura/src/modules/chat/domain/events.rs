use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::Message;
use super::value_objects::RequestId;

/// 领域事件基础 trait
pub trait DomainEvent: Clone + Send + Sync {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> DateTime<Utc>;
}

/// 消息追加事件（每次追加并持久化之后发出）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAppendedEvent {
    pub message: Message,
    /// 追加后的序列长度
    pub position: usize,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for MessageAppendedEvent {
    fn event_type(&self) -> &'static str {
        "message.appended"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 忙碌状态变化事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyChangedEvent {
    pub busy: bool,
    pub in_flight: usize,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for BusyChangedEvent {
    fn event_type(&self) -> &'static str {
        "session.busy_changed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 请求失败事件（回复已折叠为固定错误文本，这里保留细节供日志/前端使用）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFailedEvent {
    pub request_id: RequestId,
    pub kind: RequestKind,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for RequestFailedEvent {
    fn event_type(&self) -> &'static str {
        "request.failed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 出站请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Text,
    Image,
}

/// 聊天领域事件枚举
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatDomainEvent {
    MessageAppended(MessageAppendedEvent),
    BusyChanged(BusyChangedEvent),
    RequestFailed(RequestFailedEvent),
}

impl ChatDomainEvent {
    pub fn message_appended(message: Message, position: usize) -> Self {
        ChatDomainEvent::MessageAppended(MessageAppendedEvent {
            message,
            position,
            timestamp: Utc::now(),
        })
    }

    pub fn busy_changed(in_flight: usize) -> Self {
        ChatDomainEvent::BusyChanged(BusyChangedEvent {
            busy: in_flight > 0,
            in_flight,
            timestamp: Utc::now(),
        })
    }

    pub fn request_failed(request_id: RequestId, kind: RequestKind, error: impl Into<String>) -> Self {
        ChatDomainEvent::RequestFailed(RequestFailedEvent {
            request_id,
            kind,
            error: error.into(),
            timestamp: Utc::now(),
        })
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            ChatDomainEvent::MessageAppended(e) => e.event_type(),
            ChatDomainEvent::BusyChanged(e) => e.event_type(),
            ChatDomainEvent::RequestFailed(e) => e.event_type(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ChatDomainEvent::MessageAppended(e) => e.timestamp(),
            ChatDomainEvent::BusyChanged(e) => e.timestamp(),
            ChatDomainEvent::RequestFailed(e) => e.timestamp(),
        }
    }
}
