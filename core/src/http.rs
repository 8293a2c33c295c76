use crate::{Error, Result};
use bytes::Bytes;
use std::fmt::Debug;

/// HttpSend is the transport that carries an already signed request.
///
/// Signing never calls it. Clients use it to dispatch the request they just
/// signed and hand the raw response to their error classifier. Implementations
/// must not retry: a retried request reuses a signature whose validity window
/// is already running.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// NoopHttpSend always fails. It is used when no transport is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected(
            "HTTP sending not supported: no HTTP client configured",
        ))
    }
}
