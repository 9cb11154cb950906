// 内容寻址的图片文件存储
//
// 文件名为图片内容的 SHA-256，相同图片只写一次。
// 返回的引用相对于数据目录（`images/<hash>.<ext>`），重启后仍然有效

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::modules::chat::ports::{GeneratedImage, ImageStore, RepositoryError};

const IMAGES_DIR: &str = "images";

/// 文件图片存储
pub struct FileImageStore {
    data_dir: PathBuf,
}

impl FileImageStore {
    pub async fn new(data_dir: PathBuf) -> Result<Self, RepositoryError> {
        fs::create_dir_all(data_dir.join(IMAGES_DIR))
            .await
            .map_err(|e| RepositoryError::StorageError(e.to_string()))?;

        Ok(Self { data_dir })
    }

    /// 计算图片引用
    pub fn reference_for(image: &GeneratedImage) -> String {
        let digest = Sha256::digest(&image.bytes);
        format!("{}/{}.{}", IMAGES_DIR, hex::encode(digest), image.extension())
    }

    /// 把引用解析为磁盘路径；不是本存储产生的引用时返回 None
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let file_name = reference.strip_prefix(IMAGES_DIR)?.strip_prefix('/')?;
        let is_plain = !file_name.is_empty()
            && file_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.')
            && !file_name.starts_with('.');
        if !is_plain {
            return None;
        }
        Some(self.data_dir.join(IMAGES_DIR).join(file_name))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[async_trait]
impl ImageStore for FileImageStore {
    async fn put(&self, image: &GeneratedImage) -> Result<String, RepositoryError> {
        let reference = Self::reference_for(image);
        let path = self.data_dir.join(&reference);

        let exists = fs::try_exists(&path)
            .await
            .map_err(|e| RepositoryError::StorageError(e.to_string()))?;
        if !exists {
            fs::write(&path, &image.bytes)
                .await
                .map_err(|e| RepositoryError::StorageError(e.to_string()))?;
            debug!(%reference, size = image.bytes.len(), "Image payload stored");
        }

        Ok(reference)
    }

    async fn get(&self, reference: &str) -> Result<Option<Vec<u8>>, RepositoryError> {
        let Some(path) = self.resolve(reference) else {
            return Ok(None);
        };

        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::StorageError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn png(payload: u8) -> GeneratedImage {
        GeneratedImage::new(
            vec![0x89, b'P', b'N', b'G', payload],
            Some("image/png".to_string()),
        )
    }

    #[tokio::test]
    async fn test_put_is_content_addressed() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileImageStore::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        let first = store.put(&png(1)).await.unwrap();
        let again = store.put(&png(1)).await.unwrap();
        let other = store.put(&png(2)).await.unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert!(first.starts_with("images/"));
        assert!(first.ends_with(".png"));
        assert_eq!(first.len(), "images/".len() + 64 + ".png".len());
    }

    #[tokio::test]
    async fn test_payload_survives_new_store_instance() {
        let temp_dir = TempDir::new().unwrap();
        let reference = {
            let store = FileImageStore::new(temp_dir.path().to_path_buf())
                .await
                .unwrap();
            store.put(&png(7)).await.unwrap()
        };

        let reopened = FileImageStore::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        let bytes = reopened.get(&reference).await.unwrap().unwrap();
        assert_eq!(bytes, png(7).bytes);
    }

    #[tokio::test]
    async fn test_foreign_references_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileImageStore::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        assert!(store.resolve("images/../secret").is_none());
        assert!(store.resolve("blob:http://localhost/abc").is_none());
        assert!(store.get("images/missing.png").await.unwrap().is_none());
    }
}
