//! Canonical request formation.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write;

use http::HeaderMap;
use http::Method;
use percent_encoding::utf8_percent_encode;

use cloudsign_core::hash::hex_sha256;
use cloudsign_core::{Error, Result, SigningRequest};

use crate::constants::{AWS_QUERY_ENCODE_SET, EMPTY_STRING_SHA256, UNSIGNED_PAYLOAD};
use crate::uri::UriEncoding;

/// Payload decides the last line of a canonical request.
#[derive(Debug, Copy, Clone)]
pub enum Payload<'a> {
    /// Raw body bytes, hashed with SHA-256.
    Bytes(&'a [u8]),
    /// A digest or sentinel that is used as is.
    Precomputed(&'a str),
}

impl Payload<'_> {
    /// The hex encoded payload hash.
    pub fn hashed(&self) -> String {
        match self {
            Payload::Bytes(b) if b.is_empty() => EMPTY_STRING_SHA256.to_string(),
            Payload::Bytes(b) => hex_sha256(b),
            Payload::Precomputed(v) => v.to_string(),
        }
    }
}

/// The payload hash used by presigned urls, which never carry a body.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PresignedPayload {
    /// `UNSIGNED-PAYLOAD`
    #[default]
    Unsigned,
    /// The digest of an empty body.
    EmptyDigest,
}

impl PresignedPayload {
    /// The literal placed in the canonical request.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresignedPayload::Unsigned => UNSIGNED_PAYLOAD,
            PresignedPayload::EmptyDigest => EMPTY_STRING_SHA256,
        }
    }
}

/// CanonicalRequest is the exact byte sequence both sides hash.
///
/// It's derived per call and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Upper-case HTTP method.
    pub method: String,
    /// Encoded path.
    pub canonical_uri: String,
    /// Encoded and sorted query string.
    pub canonical_query: String,
    /// `name:value\n` lines sorted by name.
    pub canonical_headers: String,
    /// Sorted header names joined by `;`.
    pub signed_headers: String,
    /// Hex encoded payload hash or sentinel.
    pub hashed_payload: String,
}

impl CanonicalRequest {
    /// Canonicalize the parts of a request.
    ///
    /// `query` holds decoded pairs, `path` is the wire form.
    pub fn new(
        method: &Method,
        path: &str,
        query: &[(String, String)],
        headers: &HeaderMap,
        payload: Payload<'_>,
        policy: UriEncoding,
    ) -> Result<Self> {
        let (canonical_headers, signed_headers) = canonical_headers(headers)?;

        Ok(CanonicalRequest {
            method: method.as_str().to_string(),
            canonical_uri: policy.canonical_path(path)?,
            canonical_query: canonical_query_string(&canonical_query(query)),
            canonical_headers,
            signed_headers,
            hashed_payload: payload.hashed(),
        })
    }

    /// Canonicalize a [`SigningRequest`] whose query is still decoded.
    pub fn from_signing_request(
        req: &SigningRequest,
        payload: Payload<'_>,
        policy: UriEncoding,
    ) -> Result<Self> {
        Self::new(
            &req.method,
            &req.path,
            &req.query,
            &req.headers,
            payload,
            policy,
        )
    }

    /// Hex encoded SHA-256 of this canonical request.
    pub fn hash(&self) -> String {
        hex_sha256(self.to_string().as_bytes())
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.canonical_uri)?;
        writeln!(f, "{}", self.canonical_query)?;
        // Every header line already ends with '\n'.
        writeln!(f, "{}", self.canonical_headers)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.hashed_payload)
    }
}

/// Encode keys and values independently, then sort by encoded key and value.
pub fn canonical_query(query: &[(String, String)]) -> Vec<(String, String)> {
    let mut pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort_unstable();
    pairs
}

/// Join encoded pairs as `k=v&k=v`.
pub fn canonical_query_string(pairs: &[(String, String)]) -> String {
    let mut s = String::with_capacity(pairs.iter().map(|(k, v)| k.len() + v.len() + 2).sum());
    for (i, (k, v)) in pairs.iter().enumerate() {
        if i > 0 {
            s.push('&');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(v);
    }
    s
}

/// Build canonical header lines and the signed headers list.
///
/// `HeaderMap` names are always lower-case. Values of a repeated header are
/// joined by `,` in the order they were inserted.
pub fn canonical_headers(headers: &HeaderMap) -> Result<(String, String)> {
    let mut sorted: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (name, value) in headers.iter() {
        let value = value.to_str().map_err(|e| {
            Error::request_invalid(format!("header {name} has a value that can't be signed"))
                .with_source(e)
        })?;
        sorted
            .entry(name.as_str())
            .or_default()
            .push(normalize_header_value(value));
    }

    let mut lines = String::with_capacity(256);
    for (name, values) in sorted.iter() {
        writeln!(lines, "{}:{}", name, values.join(","))?;
    }
    let signed = sorted.keys().copied().collect::<Vec<_>>().join(";");

    Ok((lines, signed))
}

/// Trim the value and collapse inner whitespace runs into one space.
fn normalize_header_value(value: &str) -> String {
    let mut s = String::with_capacity(value.len());
    for word in value.split_ascii_whitespace() {
        if !s.is_empty() {
            s.push(' ');
        }
        s.push_str(word);
    }
    s
}
