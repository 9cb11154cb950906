// Chat Adapters
// 外部服务适配器

pub mod identity;
pub mod image;
pub mod llm;
pub mod mock;

pub use identity::StaticIdentityProvider;
pub use image::{HuggingFaceConfig, HuggingFaceImageAdapter, HUGGINGFACE_IMAGE_ENDPOINT};
pub use llm::{OpenRouterAdapter, OpenRouterConfig, DEFAULT_COMPLETION_MODEL, OPENROUTER_BASE_URL};
pub use mock::{MockCompletionAdapter, MockImageAdapter};
