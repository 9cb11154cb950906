// Chat Queries - 查询定义和处理器

mod get_session_view;

pub use get_session_view::*;
