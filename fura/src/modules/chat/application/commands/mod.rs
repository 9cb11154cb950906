// Chat Commands - 命令定义和处理器

mod send_image;
mod send_text;
mod submit_input;

pub use send_image::*;
pub use send_text::*;
pub use submit_input::*;
