use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{GetOptions, GetRange, ObjectStore};

use crate::config::{StoreBackend, StoreConfig};
use crate::range::ByteRange;
use crate::source::{ByteChunkStream, ByteSource, SourceError};

/// [`ByteSource`] backed by any `object_store` implementation.
pub struct ObjectStoreSource {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreSource {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ByteSource for ObjectStoreSource {
    async fn size(&self, key: &str) -> Result<u64, SourceError> {
        let meta = self
            .store
            .head(&Path::from(key))
            .await
            .map_err(|err| map_store_error(key, err))?;
        Ok(meta.size)
    }

    async fn open(
        &self,
        key: &str,
        range: Option<ByteRange>,
    ) -> Result<ByteChunkStream, SourceError> {
        let mut options = GetOptions::default();
        // `GetRange::Bounded` is half-open; our ranges are inclusive.
        options.range = range.map(|r| GetRange::Bounded(r.start..r.end + 1));

        let owned_key = key.to_string();
        let result = self
            .store
            .get_opts(&Path::from(key), options)
            .await
            .map_err(|err| map_store_error(key, err))?;

        let stream = result
            .into_stream()
            .map_err(move |err| map_store_error(&owned_key, err))
            .boxed();

        Ok(stream)
    }
}

fn map_store_error(key: &str, err: object_store::Error) -> SourceError {
    match err {
        object_store::Error::NotFound { .. } => SourceError::NotFound {
            key: key.to_string(),
        },
        other => SourceError::Transient {
            message: other.to_string(),
        },
    }
}

/// Build the configured store backend. S3 credentials come from the
/// environment (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, ...), never
/// from the config file.
pub fn build_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StoreBackend::S3 => {
            let bucket = config
                .bucket
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("s3 backend requires `store.bucket`"))?;

            let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
            if let Some(region) = &config.region {
                builder = builder.with_region(region);
            }
            if let Some(endpoint) = &config.endpoint {
                builder = builder
                    .with_endpoint(endpoint)
                    .with_allow_http(endpoint.starts_with("http://"));
            }

            Ok(Arc::new(builder.build()?))
        }

        StoreBackend::Filesystem => {
            let root = config
                .root
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("filesystem backend requires `store.root`"))?;
            Ok(Arc::new(LocalFileSystem::new_with_prefix(root)?))
        }

        StoreBackend::Memory => Ok(Arc::new(InMemory::new())),
    }
}
