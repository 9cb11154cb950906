// Chat Infrastructure - Repositories
//
// 仓储实现：
// - InMemory*: 内存实现，用于开发和测试
// - File*: 文件持久化实现，用于生产环境

mod file_history_repository;
mod file_image_store;
mod in_memory_history_repository;
mod in_memory_image_store;

pub use file_history_repository::*;
pub use file_image_store::*;
pub use in_memory_history_repository::*;
pub use in_memory_image_store::*;
