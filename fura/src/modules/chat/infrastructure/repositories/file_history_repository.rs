// 文件持久化历史仓储实现
//
// 使用单个 JSON 文件保存整个消息序列，每次保存整体覆盖

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::modules::chat::domain::Message;
use crate::modules::chat::ports::{HistoryRepository, RepositoryError};

/// 历史记录槽位名
pub const HISTORY_KEY: &str = "furaai_chat_history";

/// 文件持久化历史仓储
pub struct FileHistoryRepository {
    file_path: PathBuf,
}

impl FileHistoryRepository {
    /// 创建新的文件历史仓储
    ///
    /// # Arguments
    /// * `data_dir` - 应用数据目录路径
    pub async fn new(data_dir: PathBuf) -> Result<Self, RepositoryError> {
        let file_path = data_dir.join(format!("{}.json", HISTORY_KEY));

        // 确保目录存在
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::StorageError(e.to_string()))?;
        }

        Ok(Self { file_path })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl HistoryRepository for FileHistoryRepository {
    async fn load(&self) -> Result<Option<Vec<Message>>, RepositoryError> {
        if !fs::try_exists(&self.file_path)
            .await
            .map_err(|e| RepositoryError::StorageError(e.to_string()))?
        {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.file_path)
            .await
            .map_err(|e| RepositoryError::StorageError(e.to_string()))?;

        let messages: Vec<Message> = serde_json::from_str(&content)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(Some(messages))
    }

    async fn save(&self, messages: &[Message]) -> Result<(), RepositoryError> {
        let content = serde_json::to_string_pretty(messages)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        fs::write(&self.file_path, content)
            .await
            .map_err(|e| RepositoryError::StorageError(e.to_string()))?;

        debug!(count = messages.len(), "History snapshot written");
        Ok(())
    }
}
