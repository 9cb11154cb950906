// Config Module
//
// 配置管理模块，采用六边形架构
//
// 层次结构:
// - domain: 领域层，包含配置实体和值对象
// - ports: 端口层，定义配置读写的抽象接口
// - infrastructure: 基础设施层，实现具体的配置存储适配器
// - application: 应用层，加载配置并应用环境变量覆盖

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型

// Domain
pub use domain::{
    ApiKey, AppConfig, CompletionConfig, IdentityConfig, ImageConfig, DEFAULT_DATA_DIR,
};

// Ports
pub use ports::{ConfigError, ConfigRepository};

// Infrastructure
pub use infrastructure::{FileConfigRepository, InMemoryConfigRepository, CONFIG_FILE_NAME};

// Application
pub use application::{ConfigService, EnvLookup};

use std::path::Path;
use std::sync::Arc;

/// Config 模块容器
///
/// 管理模块内的依赖注入
pub struct ConfigModule {
    service: ConfigService,
}

impl ConfigModule {
    /// 使用内存仓储创建（用于测试）
    pub fn new_in_memory() -> Self {
        let repository = Arc::new(InMemoryConfigRepository::new());
        Self {
            service: ConfigService::new(repository),
        }
    }

    /// 使用文件存储创建
    pub fn new_with_file(data_dir: impl AsRef<Path>) -> Self {
        let repository = Arc::new(FileConfigRepository::new(data_dir));
        Self {
            service: ConfigService::new(repository),
        }
    }

    /// 使用自定义仓储创建
    pub fn with_repository(repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            service: ConfigService::new(repository),
        }
    }

    /// 获取配置服务
    pub fn service(&self) -> &ConfigService {
        &self.service
    }

    /// 加载生效配置
    pub async fn load(&self) -> Result<AppConfig, ConfigError> {
        self.service.load().await
    }

    /// 保存配置
    pub async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.service.save(config).await
    }

    /// 首次运行时写入默认配置
    pub async fn ensure_initialized(&self) -> Result<bool, ConfigError> {
        self.service.ensure_initialized().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_module_integration() {
        let temp_dir = TempDir::new().unwrap();
        let module = ConfigModule::new_with_file(temp_dir.path());

        // 首次运行写入默认配置
        assert!(module.ensure_initialized().await.unwrap());
        assert!(temp_dir.path().join(CONFIG_FILE_NAME).exists());

        // 修改后重新加载
        let mut config = AppConfig::default();
        config.completion.model = "openai/gpt-4o-mini".to_string();
        module.save(&config).await.unwrap();

        let reloaded = ConfigModule::new_with_file(temp_dir.path());
        let loaded = reloaded.service().repository().load().await.unwrap();
        assert_eq!(loaded.completion.model, "openai/gpt-4o-mini");
    }
}
