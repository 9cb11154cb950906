use async_trait::async_trait;

use super::history_repository::RepositoryError;
use super::image_port::GeneratedImage;

/// 图片存储端口
///
/// 保存图片二进制并返回可嵌入消息内容、重启后仍然有效的引用
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put(&self, image: &GeneratedImage) -> Result<String, RepositoryError>;

    /// 按引用读取（引用未知时返回 None）
    async fn get(&self, reference: &str) -> Result<Option<Vec<u8>>, RepositoryError>;
}
