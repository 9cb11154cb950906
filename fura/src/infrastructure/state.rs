use std::sync::Arc;
use tracing::info;

use crate::modules::chat::{
    ChatModule, CompletionPort, HuggingFaceConfig, HuggingFaceImageAdapter, IdentityPort,
    ImagePort, MockCompletionAdapter, MockImageAdapter, OpenRouterAdapter, OpenRouterConfig,
    StaticIdentityProvider,
};
use crate::modules::config::AppConfig;
use crate::shared::AppResult;

use super::EventBus;

/// 远程服务或本地模拟
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Remote,
    Offline,
}

/// 应用全局状态
pub struct AppState {
    pub config: AppConfig,
    pub chat: Arc<ChatModule>,
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// 按配置组装适配器并恢复会话
    pub async fn build(config: AppConfig, backend: Backend) -> AppResult<Self> {
        let (completion, image) = match backend {
            Backend::Remote => remote_ports(&config)?,
            Backend::Offline => {
                info!("Running with offline mock services");
                let completion: Arc<dyn CompletionPort> = Arc::new(MockCompletionAdapter::new());
                let image: Arc<dyn ImagePort> = Arc::new(MockImageAdapter::new());
                (completion, image)
            }
        };

        let identity: Arc<dyn IdentityPort> = Arc::new(StaticIdentityProvider::new(
            config.identity.display_name.clone(),
            config.identity.avatar_url.clone(),
        ));

        let chat = ChatModule::new_with_persistence(
            config.data_dir.clone(),
            completion,
            image,
            identity,
        )
        .await?;
        info!(data_dir = %config.data_dir.display(), "Chat module initialized with persistent storage");

        let event_bus = Arc::new(EventBus::new());
        event_bus.forward_from(chat.subscribe());

        Ok(Self {
            config,
            chat: Arc::new(chat),
            event_bus,
        })
    }
}

fn remote_ports(config: &AppConfig) -> AppResult<(Arc<dyn CompletionPort>, Arc<dyn ImagePort>)> {
    if config.completion.api_key.is_none() {
        tracing::warn!("No completion API key configured, requests will be rejected");
    }
    if config.image.api_key.is_none() {
        tracing::warn!("No image API key configured, requests will be rejected");
    }

    let completion = OpenRouterAdapter::new(OpenRouterConfig {
        base_url: config.completion.base_url.clone(),
        api_key: config
            .completion
            .api_key
            .as_ref()
            .map(|k| k.expose().to_string())
            .unwrap_or_default(),
        model: config.completion.model.clone(),
        timeout_secs: config.completion.timeout_secs,
    })?;

    let image = HuggingFaceImageAdapter::new(HuggingFaceConfig {
        endpoint: config.image.endpoint.clone(),
        api_key: config
            .image
            .api_key
            .as_ref()
            .map(|k| k.expose().to_string())
            .unwrap_or_default(),
        timeout_secs: config.image.timeout_secs,
    })?;

    Ok((Arc::new(completion), Arc::new(image)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::AppEvent;
    use crate::modules::chat::{GetSessionViewQuery, SubmitInputCommand, SubmitTrigger};
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> AppConfig {
        AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_offline_state_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::build(config_in(&temp_dir), Backend::Offline)
            .await
            .unwrap();
        let mut events = state.event_bus.subscribe();

        state
            .chat
            .submit(SubmitInputCommand::new("ping", SubmitTrigger::EnterKey))
            .await
            .unwrap();

        let view = state.chat.view(GetSessionViewQuery::new()).await.unwrap();
        assert_eq!(view.total, 3);

        // 第一条转发事件是用户消息
        loop {
            if let AppEvent::MessageAppended { message, .. } = events.recv().await.unwrap() {
                assert_eq!(message.content(), "ping");
                break;
            }
        }
    }

    #[tokio::test]
    async fn test_remote_state_builds_without_keys() {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::build(config_in(&temp_dir), Backend::Remote).await;
        assert!(state.is_ok());
    }
}
