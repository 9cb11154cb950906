// Config Domain Layer
//
// 配置领域层

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
