use async_trait::async_trait;
use thiserror::Error;

use crate::modules::chat::domain::Message;

/// 仓储错误类型
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 会话历史仓储端口
///
/// 单个具名槽位保存整个消息序列的 JSON 快照，每次保存整体覆盖
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// 读取已保存的序列；槽位为空时返回 None，内容无法解析时返回 SerializationError
    async fn load(&self) -> Result<Option<Vec<Message>>, RepositoryError>;

    /// 保存完整快照，覆盖旧值
    async fn save(&self, messages: &[Message]) -> Result<(), RepositoryError>;
}
