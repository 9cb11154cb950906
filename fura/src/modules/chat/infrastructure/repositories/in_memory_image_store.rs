use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::FileImageStore;
use crate::modules::chat::ports::{GeneratedImage, ImageStore, RepositoryError};

/// 内存图片存储
///
/// 引用格式与文件存储一致，用于开发和测试
pub struct InMemoryImageStore {
    images: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self {
            images: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }
}

impl Default for InMemoryImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn put(&self, image: &GeneratedImage) -> Result<String, RepositoryError> {
        let reference = FileImageStore::reference_for(image);
        self.images
            .write()
            .await
            .insert(reference.clone(), image.bytes.clone());
        Ok(reference)
    }

    async fn get(&self, reference: &str) -> Result<Option<Vec<u8>>, RepositoryError> {
        Ok(self.images.read().await.get(reference).cloned())
    }
}
