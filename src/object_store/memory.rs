//! 内存对象存储实现
//!
//! 测试与本地开发用。key 有序存放，list 结果稳定。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{DELETE_BATCH_LIMIT, ObjectBody, ObjectRecord, ObjectStore};
use crate::errors::{Result, ShorthostError};

#[derive(Clone)]
struct StoredObject {
    bytes: Bytes,
    content_type: String,
    last_modified: DateTime<Utc>,
}

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
    /// 发起的批删除调用次数（分片后，每片一次）
    batch_calls: AtomicUsize,
    /// 写入时命中这些子串的 key 直接报错，用于演练部分失败
    rejected_key_parts: Vec<String>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 构造一个对指定 key 子串拒绝写入的实例
    pub fn rejecting(parts: &[&str]) -> Self {
        Self {
            rejected_key_parts: parts.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn batch_delete_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    pub async fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<ObjectBody> {
        let objects = self.objects.read().await;
        match objects.get(key) {
            Some(stored) => Ok(ObjectBody::from_bytes(stored.bytes.clone())),
            None => Err(ShorthostError::object_not_found(key)),
        }
    }

    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        if self.rejected_key_parts.iter().any(|p| key.contains(p)) {
            return Err(ShorthostError::object_store(format!(
                "put '{}': rejected",
                key
            )));
        }

        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn delete_batch(&self, keys: &[String]) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut deleted = 0usize;
        for chunk in keys.chunks(DELETE_BATCH_LIMIT) {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            let mut objects = self.objects.write().await;
            for key in chunk {
                objects.remove(key);
            }
            deleted += chunk.len();
        }
        Ok(deleted)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectRecord>> {
        let objects = self.objects.read().await;
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, stored)| ObjectRecord {
                key: key.clone(),
                size: Some(stored.bytes.len() as i64),
                last_modified: Some(stored.last_modified),
            })
            .collect())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.read().await.contains_key(key))
    }
}
