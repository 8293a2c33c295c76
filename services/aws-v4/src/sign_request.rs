use std::time::Duration;

use http::header;
use http::HeaderValue;
use http::Method;
use log::debug;

use cloudsign_core::time::{format_iso8601, now, DateTime};
use cloudsign_core::{Error, Result, SignRequest, SigningCredential, SigningMethod, SigningRequest};

use crate::canonical::{canonical_query, CanonicalRequest, Payload, PresignedPayload};
use crate::constants::*;
use crate::sign::{calculate_signature, generate_signing_key, string_to_sign, CredentialScope};
use crate::service::Service;
use crate::uri::UriEncoding;
use crate::Credential;

/// Methods accepted for signing.
const SUPPORTED_METHODS: [Method; 5] = [
    Method::GET,
    Method::PUT,
    Method::POST,
    Method::DELETE,
    Method::HEAD,
];

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// It holds no key material: every call derives its own signing key from the
/// credential it is given and the time it signs at.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
    uri_encoding: UriEncoding,
    content_sha256: bool,
    presigned_payload: PresignedPayload,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new builder for AWS V4 signer.
    ///
    /// Uses double path encoding and doesn't add `x-amz-content-sha256`,
    /// which is what most services expect. S3 callers should use
    /// [`RequestSigner::for_service`] with [`Service::S3`].
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            uri_encoding: UriEncoding::default(),
            content_sha256: false,
            presigned_payload: PresignedPayload::default(),

            time: None,
        }
    }

    /// Create a signer configured by a service profile.
    pub fn for_service(service: &Service, region: &str) -> Self {
        Self::new(service.signing_name(), region)
            .with_uri_encoding(service.uri_encoding())
            .with_content_sha256(service.content_sha256())
            .with_presigned_payload(service.presigned_payload())
    }

    /// Set the path encoding policy.
    pub fn with_uri_encoding(mut self, uri_encoding: UriEncoding) -> Self {
        self.uri_encoding = uri_encoding;
        self
    }

    /// Send the payload hash as `x-amz-content-sha256` in header mode.
    pub fn with_content_sha256(mut self, enabled: bool) -> Self {
        self.content_sha256 = enabled;
        self
    }

    /// Set the payload sentinel used by presigned urls.
    pub fn with_presigned_payload(mut self, payload: PresignedPayload) -> Self {
        self.presigned_payload = payload;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing or to reproduce a signature.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Signing name of the service.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region requests are scoped to.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign `req` in place at the given time.
    ///
    /// `req.query` must hold decoded pairs. Once signed it holds the encoded
    /// pairs in canonical order, with `X-Amz-Signature` last in query mode.
    pub fn sign_at(
        &self,
        req: &mut SigningRequest,
        body: &[u8],
        cred: &Credential,
        method: SigningMethod,
        now: DateTime,
    ) -> Result<()> {
        if !SUPPORTED_METHODS.contains(&req.method) {
            return Err(Error::request_invalid(format!(
                "method {} is not supported for signing",
                req.method
            )));
        }
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "credential must carry both access key id and secret access key",
            ));
        }

        canonicalize_header(req, cred, body, method, now, self.content_sha256)?;
        if req.path.is_empty() && self.uri_encoding.normalize_empty_path {
            req.path = "/".to_string();
        }

        let scope = CredentialScope::new(now, &self.region, &self.service);
        debug!("calculated scope: {scope}");

        let payload_hash = match method {
            SigningMethod::Header => match req.headers.get(X_AMZ_CONTENT_SHA_256) {
                Some(v) => v.to_str()?.to_string(),
                None => Payload::Bytes(body).hashed(),
            },
            SigningMethod::Query(expires) => {
                canonicalize_query(req, cred, expires, now, &scope)?;
                self.presigned_payload.as_str().to_string()
            }
        };

        let creq = CanonicalRequest::from_signing_request(
            req,
            Payload::Precomputed(&payload_hash),
            self.uri_encoding,
        )?;
        let string_to_sign = string_to_sign(&creq, &scope, now);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(&cred.secret_access_key, &scope);
        let signature = calculate_signature(&signing_key, &string_to_sign);

        req.query = canonical_query(&req.query);
        match method {
            SigningMethod::Query(_) => {
                req.query_push(X_AMZ_SIGNATURE_QUERY, signature);
            }
            SigningMethod::Header => {
                let mut authorization = HeaderValue::from_str(&format!(
                    "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
                    cred.access_key_id, scope, creq.signed_headers, signature
                ))?;
                authorization.set_sensitive(true);

                req.headers.insert(header::AUTHORIZATION, authorization);
            }
        }

        Ok(())
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        req: &mut SigningRequest,
        body: &[u8],
        credential: &Self::Credential,
        method: SigningMethod,
    ) -> Result<()> {
        self.sign_at(req, body, credential, method, self.time.unwrap_or_else(now))
    }
}

fn canonicalize_header(
    req: &mut SigningRequest,
    cred: &Credential,
    body: &[u8],
    method: SigningMethod,
    now: DateTime,
    content_sha256: bool,
) -> Result<()> {
    // A stale signature must never be signed over.
    req.headers.remove(header::AUTHORIZATION);

    // Insert HOST header if not present.
    if !req.headers.contains_key(header::HOST) {
        req.headers
            .insert(header::HOST, HeaderValue::from_str(req.authority.as_str())?);
    }

    if method != SigningMethod::Header {
        return Ok(());
    }

    req.headers
        .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);

    if content_sha256 && !req.headers.contains_key(X_AMZ_CONTENT_SHA_256) {
        req.headers.insert(
            X_AMZ_CONTENT_SHA_256,
            HeaderValue::try_from(Payload::Bytes(body).hashed())?,
        );
    }

    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token)?;
        // Keep the token out of debug output.
        value.set_sensitive(true);

        req.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}

fn canonicalize_query(
    req: &mut SigningRequest,
    cred: &Credential,
    expires: Duration,
    now: DateTime,
    scope: &CredentialScope<'_>,
) -> Result<()> {
    let secs = expires.as_secs();
    if !(1..=MAX_PRESIGN_EXPIRES_SECS).contains(&secs) {
        return Err(Error::request_invalid(format!(
            "presigned url expiry must be between 1 and {MAX_PRESIGN_EXPIRES_SECS} seconds, got {secs}"
        )));
    }

    let signed_headers = req.header_name_to_vec_sorted().join(";");

    req.query_push(X_AMZ_ALGORITHM_QUERY, ALGORITHM);
    req.query_push(
        X_AMZ_CREDENTIAL_QUERY,
        format!("{}/{}", cred.access_key_id, scope),
    );
    req.query_push(X_AMZ_DATE_QUERY, format_iso8601(now));
    req.query_push(X_AMZ_EXPIRES_QUERY, secs.to_string());
    req.query_push(X_AMZ_SIGNED_HEADERS_QUERY, signed_headers);

    if let Some(token) = &cred.session_token {
        req.query_push(X_AMZ_SECURITY_TOKEN_QUERY, token.as_str());
    }

    Ok(())
}
