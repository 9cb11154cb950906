// Chat Domain - Services
// 领域服务处理不属于任何实体的业务逻辑

mod context_builder;
mod input_router;
mod reply_composer;

pub use context_builder::*;
pub use input_router::*;
pub use reply_composer::*;
