//! Response framing and the streaming copy from byte source to sink.
//!
//! The responder consumes one [`RangeDecision`] per request and produces
//! exactly one response. Once headers are on the wire the status can no
//! longer change; failures after that point abort the connection instead.


use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use http::{HeaderMap, HeaderValue, StatusCode, header};
use thiserror::Error;

use crate::range::{ByteRange, RangeDecision};
use crate::source::{ByteSource, SourceError};

const UNSATISFIABLE_BODY: &[u8] = b"Requested range not satisfiable\n";

/// The response side of one HTTP exchange. Headers go out once; chunk and
/// finish calls report [`SinkError::Closed`] when the client has gone away.
#[async_trait]
pub trait ResponseSink: Send {
    /// Write the status line and headers. `end` marks a bodyless response.
    async fn send_header(
        &mut self,
        status: StatusCode,
        headers: HeaderMap,
        end: bool,
    ) -> Result<(), SinkError>;

    async fn send_chunk(&mut self, chunk: Bytes) -> Result<(), SinkError>;

    /// End the body stream.
    async fn finish(&mut self) -> Result<(), SinkError>;
}

#[derive(Debug, Error)]
pub enum SinkError {
    /// The client disconnected. Not a fault; the copy just stops.
    #[error("client disconnected")]
    Closed,
}

/// How one response ended.
#[derive(Debug)]
pub enum StreamOutcome {
    /// Headers and full body delivered.
    Completed { bytes_sent: u64 },
    /// Client went away mid-copy; the source stream was dropped promptly.
    Disconnected { bytes_sent: u64 },
    /// The store failed after headers were already on the wire. The caller
    /// can only terminate the connection at this point.
    SourceFailed { bytes_sent: u64, error: SourceError },
}

#[derive(Debug, Error)]
pub enum RespondError {
    /// The source failed before any header was written; the caller still
    /// owns the status line and maps this to 404 or 5xx.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Emit status, headers and body for a resolved range decision.
///
/// `include_body` is false for HEAD requests: headers are framed identically
/// but no source stream is opened and no body is written.
pub async fn respond(
    decision: RangeDecision,
    source: &dyn ByteSource,
    key: &str,
    content_type: &str,
    include_body: bool,
    sink: &mut dyn ResponseSink,
) -> Result<StreamOutcome, RespondError> {
    match decision {
        RangeDecision::Unsatisfiable => respond_unsatisfiable(include_body, sink).await,

        RangeDecision::Full(size) => {
            let mut headers = base_headers(content_type);
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));

            stream_body(
                source,
                key,
                None,
                size,
                StatusCode::OK,
                headers,
                include_body,
                sink,
            )
            .await
        }

        RangeDecision::Partial(range, size) => {
            let mut headers = base_headers(content_type);
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(range.len()));
            headers.insert(
                header::CONTENT_RANGE,
                HeaderValue::from_str(&format!("bytes {}-{}/{}", range.start, range.end, size))
                    .unwrap(),
            );

            stream_body(
                source,
                key,
                Some(range),
                range.len(),
                StatusCode::PARTIAL_CONTENT,
                headers,
                include_body,
                sink,
            )
            .await
        }
    }
}

fn base_headers(content_type: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type).unwrap(),
    );
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    headers
}

/// 416 is terminal: no byte-source open call is ever made for it.
async fn respond_unsatisfiable(
    include_body: bool,
    sink: &mut dyn ResponseSink,
) -> Result<StreamOutcome, RespondError> {
    let body = Bytes::from_static(UNSATISFIABLE_BODY);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from(body.len() as u64),
    );

    if !include_body {
        return match sink
            .send_header(StatusCode::RANGE_NOT_SATISFIABLE, headers, true)
            .await
        {
            Ok(()) => Ok(StreamOutcome::Completed { bytes_sent: 0 }),
            Err(SinkError::Closed) => Ok(StreamOutcome::Disconnected { bytes_sent: 0 }),
        };
    }

    if sink
        .send_header(StatusCode::RANGE_NOT_SATISFIABLE, headers, false)
        .await
        .is_err()
    {
        return Ok(StreamOutcome::Disconnected { bytes_sent: 0 });
    }

    let sent = body.len() as u64;
    if sink.send_chunk(body).await.is_err() || sink.finish().await.is_err() {
        return Ok(StreamOutcome::Disconnected { bytes_sent: 0 });
    }

    Ok(StreamOutcome::Completed { bytes_sent: sent })
}

/// Open the source, frame the headers, then forward chunks until `expected`
/// bytes have gone out. The copy never buffers the object; chunks are
/// forwarded as the store yields them. Over-delivery is trimmed, short
/// delivery surfaces as [`StreamOutcome::SourceFailed`].
#[allow(clippy::too_many_arguments)]
async fn stream_body(
    source: &dyn ByteSource,
    key: &str,
    range: Option<ByteRange>,
    expected: u64,
    status: StatusCode,
    headers: HeaderMap,
    include_body: bool,
    sink: &mut dyn ResponseSink,
) -> Result<StreamOutcome, RespondError> {
    if !include_body {
        return match sink.send_header(status, headers, true).await {
            Ok(()) => Ok(StreamOutcome::Completed { bytes_sent: 0 }),
            Err(SinkError::Closed) => Ok(StreamOutcome::Disconnected { bytes_sent: 0 }),
        };
    }

    // Open before the headers go out so a failing open can still become a
    // clean error status upstream.
    let mut stream = source.open(key, range).await?;

    if sink.send_header(status, headers, false).await.is_err() {
        return Ok(StreamOutcome::Disconnected { bytes_sent: 0 });
    }

    let mut remaining = expected;
    let mut sent: u64 = 0;

    while remaining > 0 {
        match stream.next().await {
            None => {
                return Ok(StreamOutcome::SourceFailed {
                    bytes_sent: sent,
                    error: SourceError::Truncated {
                        expected,
                        actual: sent,
                    },
                });
            }

            Some(Err(error)) => {
                return Ok(StreamOutcome::SourceFailed {
                    bytes_sent: sent,
                    error,
                });
            }

            Some(Ok(mut chunk)) => {
                if chunk.is_empty() {
                    continue;
                }
                if chunk.len() as u64 > remaining {
                    chunk.truncate(remaining as usize);
                }
                let chunk_len = chunk.len() as u64;

                if sink.send_chunk(chunk).await.is_err() {
                    // Dropping the stream here releases the store-side read.
                    return Ok(StreamOutcome::Disconnected { bytes_sent: sent });
                }

                sent += chunk_len;
                remaining -= chunk_len;
            }
        }
    }

    if sink.finish().await.is_err() {
        return Ok(StreamOutcome::Disconnected { bytes_sent: sent });
    }

    Ok(StreamOutcome::Completed { bytes_sent: sent })
}
