// File-based Config Repository
//
// 基于 JSON 文件的配置仓储实现

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::modules::config::domain::AppConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// 文件配置仓储
///
/// 配置保存在数据目录下的 `config.json`
pub struct FileConfigRepository {
    /// 配置文件路径
    config_path: PathBuf,
    /// 内存缓存
    cache: Arc<RwLock<Option<AppConfig>>>,
}

impl FileConfigRepository {
    /// 创建新的文件配置仓储
    ///
    /// # Arguments
    /// * `data_dir` - 应用数据目录
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: data_dir.as_ref().join(CONFIG_FILE_NAME),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 从文件加载配置
    async fn load_from_file(&self) -> Result<Option<AppConfig>, ConfigError> {
        let exists = tokio::fs::try_exists(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;
        if !exists {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;

        let config: AppConfig = serde_json::from_str(&content)?;

        debug!(path = %self.config_path.display(), "Loaded config file");
        Ok(Some(config))
    }

    /// 保存配置到文件
    async fn save_to_file(&self, config: &AppConfig) -> Result<(), ConfigError> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::StorageError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(config)?;

        tokio::fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for FileConfigRepository {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        // 先检查缓存
        {
            let cache = self.cache.read().await;
            if let Some(ref config) = *cache {
                return Ok(config.clone());
            }
        }

        let config = self.load_from_file().await?.unwrap_or_default();

        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        Ok(config)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.save_to_file(config).await?;

        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        Ok(())
    }

    async fn exists(&self) -> Result<bool, ConfigError> {
        tokio::fs::try_exists(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))
    }
}
