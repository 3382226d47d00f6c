use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use pingora::prelude::*;
use pingora::{Custom, Error};

use crate::config::VideoConfig;
use crate::range::resolve;
use crate::respond::{RespondError, StreamOutcome, respond};
use crate::server::sink::SessionSink;
use crate::source::{ByteSource, SourceError};

/// Serves the one configured video object, honoring byte-range requests.
///
/// Every request is answered in `request_filter`; there is no upstream to
/// proxy to.
pub struct VideoGateway {
    source: Arc<dyn ByteSource>,
    key: String,
    route: String,
    content_type: String,
}

impl VideoGateway {
    pub fn new(source: Arc<dyn ByteSource>, video: &VideoConfig) -> Self {
        Self {
            source,
            key: video.key.clone(),
            route: video.route.clone(),
            content_type: video.content_type.clone(),
        }
    }
}

#[async_trait]
impl ProxyHttp for VideoGateway {
    type CTX = ();

    fn new_ctx(&self) -> Self::CTX {}

    /// Never reached: `request_filter` answers every request locally.
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        Err(Error::new(Custom("vidgate has no upstream")))
    }

    /// ACCEPT --> RESOLVE RANGE --> STREAM
    async fn request_filter(&self, session: &mut Session, _ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();
        let method = req.method.clone();
        let path = req.uri.path().to_string();
        let range_header = req
            .headers
            .get(http::header::RANGE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if path != self.route {
            session.respond_error(StatusCode::NOT_FOUND.as_u16()).await?;
            return Ok(true);
        }

        let include_body = if method == http::Method::GET {
            true
        } else if method == http::Method::HEAD {
            false
        } else {
            session
                .respond_error(StatusCode::METHOD_NOT_ALLOWED.as_u16())
                .await?;
            return Ok(true);
        };

        // Fresh size lookup per request; the store is authoritative. The
        // subsequent ranged read is a second call with no consistency
        // guarantee between the two (accepted weak consistency).
        let size = match self.source.size(&self.key).await {
            Ok(size) => size,
            Err(err) => {
                let status = status_for_source_error(&err);
                tracing::warn!(key = %self.key, error = %err, "size lookup failed");
                session.respond_error(status.as_u16()).await?;
                return Ok(true);
            }
        };

        let decision = resolve(size, range_header.as_deref());

        let mut sink = SessionSink::new(session);
        let outcome = respond(
            decision,
            self.source.as_ref(),
            &self.key,
            &self.content_type,
            include_body,
            &mut sink,
        )
        .await;

        match outcome {
            Ok(StreamOutcome::Completed { bytes_sent }) => {
                tracing::info!(method = %method, key = %self.key, bytes_sent, "request served");
            }

            Ok(StreamOutcome::Disconnected { bytes_sent }) => {
                tracing::debug!(key = %self.key, bytes_sent, "client disconnected mid-stream");
            }

            Ok(StreamOutcome::SourceFailed { bytes_sent, error }) => {
                // Headers are already on the wire; the only honest move is
                // to terminate the connection without a trailer.
                tracing::error!(key = %self.key, bytes_sent, error = %error, "byte source failed mid-stream");
                return Err(Error::new(Custom("byte source failed mid-stream")));
            }

            Err(RespondError::Source(err)) => {
                let status = status_for_source_error(&err);
                tracing::warn!(key = %self.key, error = %err, "byte source open failed");
                session.respond_error(status.as_u16()).await?;
            }
        }

        Ok(true)
    }
}

/// Map a pre-header source failure onto the client-facing status. The body
/// stays opaque; store identifiers only ever reach the logs.
pub(crate) fn status_for_source_error(err: &SourceError) -> StatusCode {
    match err {
        SourceError::NotFound { .. } => StatusCode::NOT_FOUND,
        SourceError::Transient { .. } | SourceError::Truncated { .. } => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_object_maps_to_404() {
        let err = SourceError::NotFound {
            key: "video.mp4".to_string(),
        };
        assert_eq!(status_for_source_error(&err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn transient_store_failure_maps_to_502() {
        let err = SourceError::Transient {
            message: "connection reset".to_string(),
        };
        assert_eq!(status_for_source_error(&err), StatusCode::BAD_GATEWAY);
    }
}
