use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::modules::chat::domain::Message;
use crate::modules::chat::ports::{HistoryRepository, RepositoryError};

/// 内存历史仓储
///
/// 用于开发和测试；保留每一次写入的快照，便于检查持久化顺序
pub struct InMemoryHistoryRepository {
    /// 原始 JSON 槽位
    slot: RwLock<Option<String>>,
    /// 写入过的快照
    saves: RwLock<Vec<Vec<Message>>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
            saves: RwLock::new(Vec::new()),
        }
    }

    /// 使用预置的原始槽位内容创建（可以是无效 JSON）
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(raw.into())),
            saves: RwLock::new(Vec::new()),
        }
    }

    /// 使用预置消息创建
    pub fn with_messages(messages: &[Message]) -> Result<Self, RepositoryError> {
        let raw = serde_json::to_string(messages)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        Ok(Self::with_raw(raw))
    }

    /// 所有写入过的快照（按写入顺序）
    pub async fn saves(&self) -> Vec<Vec<Message>> {
        self.saves.read().await.clone()
    }

    /// 当前槽位的原始内容
    pub async fn raw(&self) -> Option<String> {
        self.slot.read().await.clone()
    }
}

impl Default for InMemoryHistoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn load(&self) -> Result<Option<Vec<Message>>, RepositoryError> {
        let slot = self.slot.read().await;
        match slot.as_deref() {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| RepositoryError::SerializationError(e.to_string())),
        }
    }

    async fn save(&self, messages: &[Message]) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(messages)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        *self.slot.write().await = Some(raw);
        self.saves.write().await.push(messages.to_vec());
        Ok(())
    }
}
