use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use pingora::prelude::Session;
use pingora_http::ResponseHeader;

use crate::respond::{ResponseSink, SinkError};

/// [`ResponseSink`] adapter over a Pingora session. Any write failure is
/// treated as the client having gone away; the underlying error is logged
/// at debug level and the copy upstream stops.
pub struct SessionSink<'a> {
    session: &'a mut Session,
}

impl<'a> SessionSink<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ResponseSink for SessionSink<'_> {
    async fn send_header(
        &mut self,
        status: StatusCode,
        headers: HeaderMap,
        end: bool,
    ) -> Result<(), SinkError> {
        let mut resp = ResponseHeader::build(status, None).map_err(|err| {
            tracing::debug!(error = %err, "failed to build response header");
            SinkError::Closed
        })?;

        for (name, value) in headers.iter() {
            resp.insert_header(name, value).map_err(|err| {
                tracing::debug!(error = %err, "failed to insert response header");
                SinkError::Closed
            })?;
        }

        self.session
            .write_response_header(Box::new(resp), end)
            .await
            .map_err(|err| {
                tracing::debug!(error = %err, "response header write failed");
                SinkError::Closed
            })
    }

    async fn send_chunk(&mut self, chunk: Bytes) -> Result<(), SinkError> {
        self.session
            .write_response_body(Some(chunk), false)
            .await
            .map_err(|err| {
                tracing::debug!(error = %err, "response body write failed");
                SinkError::Closed
            })
    }

    async fn finish(&mut self) -> Result<(), SinkError> {
        self.session
            .write_response_body(None, true)
            .await
            .map_err(|err| {
                tracing::debug!(error = %err, "response end-of-stream write failed");
                SinkError::Closed
            })
    }
}
