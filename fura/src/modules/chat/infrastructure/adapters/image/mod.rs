// Image Adapters
// 图片生成提供商的适配器实现

mod huggingface;

pub use huggingface::*;
