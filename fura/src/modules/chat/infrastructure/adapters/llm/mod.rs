// LLM Adapters
// 文本补全提供商的适配器实现

mod openrouter;

pub use openrouter::*;
