use crate::modules::chat::ports::{IdentityPort, UserProfile};

/// 固定身份提供方
///
/// 登录由外部组件负责，这里只保存启动时读到的名称和头像
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    profile: UserProfile,
}

impl StaticIdentityProvider {
    pub fn new(display_name: Option<String>, avatar_url: Option<String>) -> Self {
        Self {
            profile: UserProfile {
                display_name,
                avatar_url,
            },
        }
    }

    /// 未登录
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityPort for StaticIdentityProvider {
    fn current_user(&self) -> UserProfile {
        self.profile.clone()
    }
}
