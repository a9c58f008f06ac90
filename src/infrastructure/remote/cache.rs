use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs as async_fs;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// 缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: u64,
    pub ttl: u64, // Time to live in seconds
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, ttl: u64) -> Self {
        Self {
            data,
            timestamp: now_secs(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        now_secs().saturating_sub(self.timestamp) > self.ttl
    }
}

/// 目录的磁盘缓存
///
/// 读写失败都不影响解析：读取失败按未命中处理，写入失败只记录日志。
#[derive(Debug, Clone)]
pub struct CatalogCache {
    cache_dir: PathBuf,
    ttl: u64,
}

impl CatalogCache {
    pub fn new(cache_dir: impl Into<PathBuf>, ttl: u64) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ttl,
        }
    }

    /// 获取缓存文件路径
    fn cache_file_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// 保存缓存到文件
    pub async fn save<T: Serialize>(&self, key: &str, data: T) -> AppResult<()> {
        let entry = CacheEntry::new(data, self.ttl);
        let json = serde_json::to_string_pretty(&entry)?;

        async_fs::create_dir_all(&self.cache_dir).await?;
        async_fs::write(self.cache_file_path(key), json).await?;

        tracing::debug!("缓存已保存: {}", key);
        Ok(())
    }

    /// 读取未过期的缓存；不存在、损坏或过期都返回 `None`
    pub async fn load<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let file_path = self.cache_file_path(key);
        let json = async_fs::read_to_string(&file_path).await.ok()?;

        let entry: CacheEntry<T> = match serde_json::from_str(&json) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("缓存文件损坏 {}: {}", file_path.display(), e);
                return None;
            }
        };

        if entry.is_expired() {
            tracing::debug!("缓存已过期: {}", key);
            // 过期文件删除失败无妨，下次保存会覆盖
            let _ = async_fs::remove_file(&file_path).await;
            return None;
        }

        tracing::debug!("使用缓存: {}", key);
        Some(entry.data)
    }

    /// 删除缓存
    pub async fn clear(&self, key: &str) -> AppResult<()> {
        let file_path = self.cache_file_path(key);
        if async_fs::try_exists(&file_path).await? {
            async_fs::remove_file(&file_path).await?;
        }
        Ok(())
    }
}
