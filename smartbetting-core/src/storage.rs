//! Object storage sink.
//!
//! Objects are written through the `object_store` crate: [`S3Sink`] talks to
//! Amazon S3 (or any S3-compatible endpoint) and [`MemorySink`] keeps
//! everything in process for tests and dry runs. Writes are plain puts, so an
//! existing object at the same key is overwritten.

use crate::config::StorageConfig;
use crate::error::StorageError;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Content type attached to every JSON upload.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A destination that accepts whole objects addressed by bucket and key.
#[async_trait]
pub trait ObjectSink: Send + Sync {
    /// Create or overwrite `bucket/key` with `body`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &'static str,
    ) -> Result<(), StorageError>;
}

/// Upload JSON text to `bucket/key` with an `application/json` content type.
///
/// Bucket and key accept anything string-like, including the lake constants.
pub async fn upload(
    sink: &dyn ObjectSink,
    json_text: &str,
    bucket: impl AsRef<str>,
    key: impl AsRef<str>,
) -> Result<(), StorageError> {
    let (bucket, key) = (bucket.as_ref(), key.as_ref());
    info!(bucket, key, bytes = json_text.len(), "Uploading JSON to S3...");
    sink.put_object(
        bucket,
        key,
        Bytes::copy_from_slice(json_text.as_bytes()),
        JSON_CONTENT_TYPE,
    )
    .await?;
    info!(bucket, key, "JSON uploaded to S3!!!");
    Ok(())
}

fn put_options(content_type: &'static str) -> PutOptions {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.into());
    PutOptions {
        attributes,
        ..Default::default()
    }
}

async fn put_with_content_type(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    body: Bytes,
    content_type: &'static str,
) -> Result<(), StorageError> {
    let path = Path::from(key);
    store
        .put_opts(&path, PutPayload::from(body), put_options(content_type))
        .await
        .map_err(|source| StorageError::ObjectStore {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source,
        })?;
    Ok(())
}

/// Amazon S3 sink.
///
/// Credentials and region come from the environment
/// (`AmazonS3Builder::from_env`), with optional overrides from
/// [`StorageConfig`].
#[derive(Debug, Clone, Default)]
pub struct S3Sink {
    config: StorageConfig,
}

impl S3Sink {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn build_store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>, StorageError> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        if let Some(region) = &self.config.region {
            builder = builder.with_region(region);
        }

        if let Some(endpoint) = &self.config.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_virtual_hosted_style_request(false);
        }

        if self.config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder.build().map_err(|source| StorageError::Config {
            bucket: bucket.to_string(),
            source,
        })?;
        Ok(Arc::new(store))
    }
}

#[async_trait]
impl ObjectSink for S3Sink {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &'static str,
    ) -> Result<(), StorageError> {
        let store = self.build_store(bucket)?;
        debug!(bucket, key, "Writing object to S3");
        put_with_content_type(store.as_ref(), bucket, key, body, content_type).await
    }
}

/// An object read back from a [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
}

impl StoredObject {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// In-process sink with one `InMemory` store per bucket.
#[derive(Debug, Default)]
pub struct MemorySink {
    buckets: Mutex<HashMap<String, Arc<InMemory>>>,
    puts: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put_object` calls received, successful or not.
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn bucket(&self, name: &str) -> Arc<InMemory> {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        buckets
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(InMemory::new()))
            .clone()
    }

    /// Read an object back, or `None` when it was never written.
    pub async fn get_object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let store = self.bucket(bucket);
        let result = store.get(&Path::from(key)).await.ok()?;
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string());
        let body = result.bytes().await.ok()?;
        Some(StoredObject { body, content_type })
    }

    /// Keys currently stored in `bucket`, sorted.
    pub async fn keys(&self, bucket: &str) -> object_store::Result<Vec<String>> {
        use futures::TryStreamExt;

        let store = self.bucket(bucket);
        let mut keys: Vec<String> = store
            .list(None)
            .map_ok(|meta| meta.location.to_string())
            .try_collect()
            .await?;
        keys.sort();
        Ok(keys)
    }
}

#[async_trait]
impl ObjectSink for MemorySink {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &'static str,
    ) -> Result<(), StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let store = self.bucket(bucket);
        put_with_content_type(store.as_ref(), bucket, key, body, content_type).await
    }
}
