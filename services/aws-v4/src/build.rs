//! Assembling signed request descriptors.

use std::str::FromStr;

use bytes::Bytes;
use http::uri::{Authority, Scheme};
use http::{HeaderMap, Method};

use cloudsign_core::{Result, Signer, SigningMethod, SigningRequest};

use crate::uri::UriEncoding;
use crate::Credential;

/// SignedRequest is what a service client hands to the transport.
///
/// It's only valid for a short window after signing and must not be sent
/// twice.
#[derive(Debug)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute url, including every signed query parameter.
    pub url: String,
    /// Headers, including `Authorization` in header mode.
    pub headers: HeaderMap,
}

impl SignedRequest {
    /// Turn the descriptor into an `http::Request` carrying `body`.
    pub fn into_http(self, body: impl Into<Bytes>) -> Result<http::Request<Bytes>> {
        let mut req = http::Request::builder()
            .method(self.method)
            .uri(self.url)
            .body(body.into())?;
        *req.headers_mut() = self.headers;
        Ok(req)
    }
}

/// RequestBuilder turns request parts into a [`SignedRequest`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    signer: Signer<Credential>,
    scheme: Scheme,
}

impl RequestBuilder {
    /// Create a builder that signs with `signer` and targets https.
    pub fn new(signer: Signer<Credential>) -> Self {
        Self {
            signer,
            scheme: Scheme::HTTPS,
        }
    }

    /// Change the url scheme, for local endpoints.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// The signer used by this builder.
    pub fn signer(&self) -> &Signer<Credential> {
        &self.signer
    }

    /// Build and sign a request.
    ///
    /// `path` and `query` are raw: they are encoded here. `body` is hashed
    /// in header mode; it's not part of the descriptor.
    #[allow(clippy::too_many_arguments)]
    pub fn build_request<K, V>(
        &self,
        method: Method,
        host: &str,
        path: &str,
        query: impl IntoIterator<Item = (K, V)>,
        body: &[u8],
        headers: HeaderMap,
        signing: SigningMethod,
    ) -> Result<SignedRequest>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut req = SigningRequest::new(
            method,
            self.scheme.clone(),
            Authority::from_str(host)?,
            UriEncoding::encode_path(path),
            query
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            headers,
        );

        self.signer.sign_request(&mut req, body, signing)?;

        Ok(SignedRequest {
            url: req.url(),
            method: req.method,
            headers: req.headers,
        })
    }
}
