// Config Infrastructure Layer
//
// 配置存储适配器

pub mod file_repository;
pub mod memory_repository;

pub use file_repository::*;
pub use memory_repository::*;
