use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::super::{ApplicationError, ChatSession, QueryHandler};
use crate::modules::chat::domain::Message;
use crate::modules::chat::ports::{IdentityPort, UserProfile};

/// 获取会话视图查询
#[derive(Debug, Clone, Default)]
pub struct GetSessionViewQuery {
    /// 只取最后 N 条消息
    pub tail: Option<usize>,
}

impl GetSessionViewQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tail(count: usize) -> Self {
        Self { tail: Some(count) }
    }
}

/// 会话视图
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub messages: Vec<Message>,
    /// 序列总长度
    pub total: usize,
    pub draft: String,
    pub busy: bool,
    /// "Thinking..." 或 "Send"
    pub submit_label: &'static str,
    pub user: UserProfile,
}

/// 获取会话视图处理器
#[derive(Clone)]
pub struct GetSessionViewHandler {
    session: Arc<ChatSession>,
    identity: Arc<dyn IdentityPort>,
}

impl GetSessionViewHandler {
    pub fn new(session: Arc<ChatSession>, identity: Arc<dyn IdentityPort>) -> Self {
        Self { session, identity }
    }
}

#[async_trait]
impl QueryHandler<GetSessionViewQuery, SessionView> for GetSessionViewHandler {
    async fn handle(&self, query: GetSessionViewQuery) -> Result<SessionView, ApplicationError> {
        let mut messages = self.session.messages().await;
        let total = messages.len();

        if let Some(tail) = query.tail {
            let skip = total.saturating_sub(tail);
            messages.drain(..skip);
        }

        Ok(SessionView {
            messages,
            total,
            draft: self.session.draft().await,
            busy: self.session.is_busy(),
            submit_label: self.session.submit_label(),
            user: self.identity.current_user(),
        })
    }
}
