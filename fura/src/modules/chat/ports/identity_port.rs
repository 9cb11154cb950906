use serde::{Deserialize, Serialize};

/// 当前用户信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// 显示名称，未登录时为 "You"
    pub fn display_name_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or("You")
    }
}

/// 身份提供方端口
///
/// 只读取显示名称和头像，不管理登录状态
pub trait IdentityPort: Send + Sync {
    fn current_user(&self) -> UserProfile;
}
