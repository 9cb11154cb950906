// Chat Infrastructure Layer
// 基础设施层包含端口的具体实现

pub mod adapters;
pub mod repositories;

// 重导出常用类型
pub use adapters::{
    HuggingFaceConfig, HuggingFaceImageAdapter, MockCompletionAdapter, MockImageAdapter,
    OpenRouterAdapter, OpenRouterConfig, StaticIdentityProvider, DEFAULT_COMPLETION_MODEL,
    HUGGINGFACE_IMAGE_ENDPOINT, OPENROUTER_BASE_URL,
};
pub use repositories::{
    FileHistoryRepository, FileImageStore, InMemoryHistoryRepository, InMemoryImageStore,
    HISTORY_KEY,
};
