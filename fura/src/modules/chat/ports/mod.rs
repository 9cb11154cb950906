// Chat Ports Layer
// 端口定义了模块与外部世界的接口

mod completion_port;
mod history_repository;
mod identity_port;
mod image_port;
mod image_store;

pub use completion_port::*;
pub use history_repository::*;
pub use identity_port::*;
pub use image_port::*;
pub use image_store::*;
