//! 对象存储抽象
//!
//! 站点文件的唯一真身存放在兼容 S3 协议的对象存储里。这里定义能力面，
//! 生产走 [`S3ObjectStore`]，测试走 [`MemoryObjectStore`]。

pub mod memory;
pub mod s3;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, stream};

use crate::errors::Result;

/// S3 DeleteObjects 单次调用的上限
pub const DELETE_BATCH_LIMIT: usize = 1000;

/// 列举返回的单个对象记录
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    pub key: String,
    pub size: Option<i64>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// 读取到的对象内容（流式）
pub struct ObjectBody {
    pub content_length: Option<u64>,
    pub stream: BoxStream<'static, std::io::Result<Bytes>>,
}

impl ObjectBody {
    pub fn from_bytes(bytes: Bytes) -> Self {
        Self {
            content_length: Some(bytes.len() as u64),
            stream: stream::once(async move { Ok(bytes) }).boxed(),
        }
    }

    /// 将整个流收集到内存
    pub async fn collect(mut self) -> std::io::Result<Bytes> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(Bytes::from(buf))
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 读取对象，不存在时返回 `ObjectNotFound`
    async fn get(&self, key: &str) -> Result<ObjectBody>;

    /// 写入对象
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()>;

    /// 删除单个对象
    async fn delete(&self, key: &str) -> Result<()>;

    /// 批量删除，内部按 [`DELETE_BATCH_LIMIT`] 分片；空列表直接返回 0
    async fn delete_batch(&self, keys: &[String]) -> Result<usize>;

    /// 列举前缀下的全部对象
    ///
    /// 分页游标在内部耗尽，调用方永远拿到完整列表。
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectRecord>>;

    /// 对象是否存在
    ///
    /// 只有「不存在」返回 `false`，其余错误向上传播。
    async fn exists(&self, key: &str) -> Result<bool>;

    /// 删除前缀下的全部对象，返回删除数量
    ///
    /// 前缀下没有对象时不发起删除调用，返回 0。
    async fn delete_folder(&self, prefix: &str) -> Result<usize> {
        let records = self.list(prefix).await?;
        if records.is_empty() {
            return Ok(0);
        }
        let keys: Vec<String> = records.into_iter().map(|r| r.key).collect();
        self.delete_batch(&keys).await
    }
}
