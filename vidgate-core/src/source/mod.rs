//! Abstraction over the remote object store.
//!
//! The gateway never talks to a vendor SDK directly; it sees a [`ByteSource`]
//! that can report an object's size and open a readable chunk stream,
//! optionally scoped to a byte range. The production implementation wraps the
//! `object_store` crate, so S3, a local directory, or an in-memory fixture
//! all satisfy the same contract.

mod store;


pub use store::{ObjectStoreSource, build_store};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::range::ByteRange;

/// Failures surfaced by a byte source. Store-internal detail stays in the
/// error for logs; client bodies never carry it.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    /// Network, timeout, throttling, or any other store-side failure.
    /// Retrying is the caller's policy, never this crate's.
    #[error("object store failure: {message}")]
    Transient { message: String },

    /// The store delivered fewer bytes than the negotiated length.
    #[error("object stream ended early: expected {expected} bytes, got {actual}")]
    Truncated { expected: u64, actual: u64 },
}

/// Chunked object bytes. Dropping the stream releases any store-side
/// resources held by the read.
pub type ByteChunkStream = BoxStream<'static, Result<Bytes, SourceError>>;

/// A store capable of reporting object size and opening a (possibly
/// range-scoped) readable stream.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Current size of the object in bytes. Looked up fresh per request;
    /// nothing is cached.
    async fn size(&self, key: &str) -> Result<u64, SourceError>;

    /// Open a readable stream over the object, or over `range` when given.
    async fn open(&self, key: &str, range: Option<ByteRange>)
    -> Result<ByteChunkStream, SourceError>;
}
