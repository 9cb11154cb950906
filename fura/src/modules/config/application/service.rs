// Config Service
//
// 配置服务门面：加载、环境变量覆盖、校验

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::modules::config::domain::{ApiKey, AppConfig};
use crate::modules::config::ports::{ConfigError, ConfigRepository};

pub const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_HUGGINGFACE_API_KEY: &str = "HUGGINGFACE_API_KEY";
pub const ENV_DATA_DIR: &str = "FURA_DATA_DIR";
pub const ENV_USER_NAME: &str = "FURA_USER_NAME";
pub const ENV_USER_AVATAR: &str = "FURA_USER_AVATAR";

/// 环境变量读取函数
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// 配置服务实现
pub struct ConfigService {
    repository: Arc<dyn ConfigRepository>,
    env: EnvLookup,
}

impl ConfigService {
    /// 使用进程环境变量
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self::with_env(repository, Arc::new(|key: &str| std::env::var(key).ok()))
    }

    /// 使用自定义环境变量来源
    pub fn with_env(repository: Arc<dyn ConfigRepository>, env: EnvLookup) -> Self {
        Self { repository, env }
    }

    /// 获取仓储引用
    pub fn repository(&self) -> &Arc<dyn ConfigRepository> {
        &self.repository
    }

    /// 加载配置并应用环境变量覆盖
    pub async fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = self.repository.load().await?;
        self.apply_env_overrides(&mut config);

        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::ValidationError { errors });
        }

        info!(
            data_dir = %config.data_dir.display(),
            model = %config.completion.model,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// 保存配置
    pub async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::ValidationError { errors });
        }
        self.repository.save(config).await
    }

    /// 配置文件不存在时写入默认配置，便于用户编辑
    pub async fn ensure_initialized(&self) -> Result<bool, ConfigError> {
        if self.repository.exists().await? {
            return Ok(false);
        }
        self.repository.save(&AppConfig::default()).await?;
        info!("Wrote default configuration");
        Ok(true)
    }

    /// 读取非空环境变量
    fn var(&self, key: &str) -> Option<String> {
        (self.env)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn apply_env_overrides(&self, config: &mut AppConfig) {
        if let Some(key) = self.var(ENV_OPENROUTER_API_KEY) {
            debug!("Completion API key taken from environment");
            config.completion.api_key = Some(ApiKey::new(key));
        }
        if let Some(key) = self.var(ENV_HUGGINGFACE_API_KEY) {
            debug!("Image API key taken from environment");
            config.image.api_key = Some(ApiKey::new(key));
        }
        if let Some(dir) = self.var(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(name) = self.var(ENV_USER_NAME) {
            config.identity.display_name = Some(name);
        }
        if let Some(avatar) = self.var(ENV_USER_AVATAR) {
            config.identity.avatar_url = Some(avatar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::config::infrastructure::InMemoryConfigRepository;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> EnvLookup {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Arc::new(move |key: &str| map.get(key).cloned())
    }

    #[tokio::test]
    async fn test_load_without_env_returns_stored_config() {
        let mut stored = AppConfig::default();
        stored.identity.display_name = Some("Stored".to_string());
        let repo = Arc::new(InMemoryConfigRepository::with_config(stored.clone()));
        let service = ConfigService::with_env(repo, env_from(&[]));

        assert_eq!(service.load().await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_env_overrides_win() {
        let repo = Arc::new(InMemoryConfigRepository::new());
        let service = ConfigService::with_env(
            repo,
            env_from(&[
                (ENV_OPENROUTER_API_KEY, "sk-or"),
                (ENV_HUGGINGFACE_API_KEY, "hf-key"),
                (ENV_DATA_DIR, "/tmp/fura"),
                (ENV_USER_NAME, "Ada"),
                (ENV_USER_AVATAR, "https://img.example/ada.png"),
            ]),
        );

        let config = service.load().await.unwrap();
        assert_eq!(config.completion.api_key, Some(ApiKey::new("sk-or")));
        assert_eq!(config.image.api_key, Some(ApiKey::new("hf-key")));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/fura"));
        assert_eq!(config.identity.display_name.as_deref(), Some("Ada"));
        assert_eq!(
            config.identity.avatar_url.as_deref(),
            Some("https://img.example/ada.png")
        );
    }

    #[tokio::test]
    async fn test_blank_env_values_are_ignored() {
        let mut stored = AppConfig::default();
        stored.completion.api_key = Some(ApiKey::new("from-file"));
        let repo = Arc::new(InMemoryConfigRepository::with_config(stored));
        let service = ConfigService::with_env(repo, env_from(&[(ENV_OPENROUTER_API_KEY, "  ")]));

        let config = service.load().await.unwrap();
        assert_eq!(config.completion.api_key, Some(ApiKey::new("from-file")));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut stored = AppConfig::default();
        stored.completion.timeout_secs = 0;
        let repo = Arc::new(InMemoryConfigRepository::with_config(stored));
        let service = ConfigService::with_env(repo, env_from(&[]));

        let result = service.load().await;
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_ensure_initialized_writes_once() {
        let repo = Arc::new(InMemoryConfigRepository::new());
        let service = ConfigService::with_env(repo.clone(), env_from(&[]));

        assert!(service.ensure_initialized().await.unwrap());
        assert!(!service.ensure_initialized().await.unwrap());
        assert!(repo.exists().await.unwrap());
    }
}
