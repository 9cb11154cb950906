// Config Domain Entities
//
// 配置领域实体定义

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::value_objects::ApiKey;
use crate::modules::chat::infrastructure::{
    DEFAULT_COMPLETION_MODEL, HUGGINGFACE_IMAGE_ENDPOINT, OPENROUTER_BASE_URL,
};

/// 默认数据目录
pub const DEFAULT_DATA_DIR: &str = ".fura";

/// 文本补全服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: OPENROUTER_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            timeout_secs: 60,
        }
    }
}

/// 图片生成服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageConfig {
    pub endpoint: String,
    pub api_key: Option<ApiKey>,
    pub timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            endpoint: HUGGINGFACE_IMAGE_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

/// 当前用户身份
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityConfig {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// 应用完整配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub image: ImageConfig,
    pub identity: IdentityConfig,
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            completion: CompletionConfig::default(),
            image: ImageConfig::default(),
            identity: IdentityConfig::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl AppConfig {
    /// 校验配置，返回全部错误描述
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.completion.base_url.trim().is_empty() {
            errors.push("completion.baseUrl must not be empty".to_string());
        }
        if self.completion.model.trim().is_empty() {
            errors.push("completion.model must not be empty".to_string());
        }
        if self.completion.timeout_secs == 0 {
            errors.push("completion.timeoutSecs must be positive".to_string());
        }
        if self.image.endpoint.trim().is_empty() {
            errors.push("image.endpoint must not be empty".to_string());
        }
        if self.image.timeout_secs == 0 {
            errors.push("image.timeoutSecs must be positive".to_string());
        }

        errors
    }
}
