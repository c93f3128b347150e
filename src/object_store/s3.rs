//! AWS S3 对象存储实现

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use bytes::Bytes;
use futures_util::StreamExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use super::{DELETE_BATCH_LIMIT, ObjectBody, ObjectRecord, ObjectStore};
use crate::config::ObjectStoreConfig;
use crate::errors::{Result, ShorthostError};

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// 根据配置初始化 S3 客户端
    ///
    /// 凭证走 AWS SDK 默认链（环境变量 / profile / IMDS）。
    /// 配置了 `endpoint` 时指向兼容实现（MinIO 等）。
    pub async fn from_config(config: &ObjectStoreConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(ref endpoint) = config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = loader.load().await;
        info!(
            "Object store: bucket '{}' in {} ({})",
            config.bucket,
            config.region,
            config.endpoint.as_deref().unwrap_or("aws")
        );

        Self {
            client: Client::new(&sdk_config),
            bucket: config.bucket.clone(),
        }
    }

    fn timestamp_to_chrono(
        ts: &aws_sdk_s3::primitives::DateTime,
    ) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<ObjectBody> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    ShorthostError::object_not_found(key)
                } else {
                    ShorthostError::object_store(format!("get '{}': {}", key, service_err))
                }
            })?;

        let content_length = output.content_length().and_then(|l| u64::try_from(l).ok());
        let stream = ReaderStream::new(output.body.into_async_read()).boxed();

        Ok(ObjectBody {
            content_length,
            stream,
        })
    }

    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                ShorthostError::object_store(format!(
                    "put '{}': {}",
                    key,
                    e.into_service_error()
                ))
            })?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                ShorthostError::object_store(format!(
                    "delete '{}': {}",
                    key,
                    e.into_service_error()
                ))
            })?;
        Ok(())
    }

    async fn delete_batch(&self, keys: &[String]) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut deleted = 0usize;
        for chunk in keys.chunks(DELETE_BATCH_LIMIT) {
            let objects: Vec<ObjectIdentifier> = chunk
                .iter()
                .map(|key| {
                    ObjectIdentifier::builder()
                        .key(key)
                        .build()
                        .map_err(|e| ShorthostError::object_store(e.to_string()))
                })
                .collect::<Result<_>>()?;

            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(|e| ShorthostError::object_store(e.to_string()))?;

            self.client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| {
                    ShorthostError::object_store(format!(
                        "delete batch of {}: {}",
                        chunk.len(),
                        e.into_service_error()
                    ))
                })?;

            deleted += chunk.len();
        }

        debug!("Deleted {} objects in batch", deleted);
        Ok(deleted)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectRecord>> {
        let mut records = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);
            if let Some(ref token) = continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| {
                ShorthostError::object_store(format!(
                    "list '{}': {}",
                    prefix,
                    e.into_service_error()
                ))
            })?;

            for object in response.contents() {
                if let Some(key) = object.key() {
                    records.push(ObjectRecord {
                        key: key.to_string(),
                        size: object.size(),
                        last_modified: object.last_modified().and_then(Self::timestamp_to_chrono),
                    });
                }
            }

            match response.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(records)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(ShorthostError::object_store(format!(
                        "head '{}': {}",
                        key, service_err
                    )))
                }
            }
        }
    }
}
