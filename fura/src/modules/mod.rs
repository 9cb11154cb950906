// Modules Layer - 业务模块
//
// 按照六边形架构组织的业务模块：
// - chat: 聊天模块，处理消息、文本回复和图片生成
// - config: 配置模块，处理服务地址、密钥和用户身份

pub mod chat;
pub mod config;

pub use chat::ChatModule;
pub use config::ConfigModule;
