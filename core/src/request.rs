use std::mem;
use std::str::FromStr;
use std::time::Duration;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;
use percent_encoding::percent_decode_str;

use crate::{Error, Result};

/// Signing context for request.
///
/// `path` is kept in its on-the-wire (already percent-encoded) form. `query`
/// holds decoded pairs until a signer canonicalizes them, after which it holds
/// the encoded pairs that go on the wire.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from its parts.
    pub fn new(
        method: Method,
        scheme: Scheme,
        authority: Authority,
        path: impl Into<String>,
        query: Vec<(String, String)>,
        headers: HeaderMap,
    ) -> Self {
        SigningRequest {
            method,
            scheme,
            authority,
            path: path.into(),
            query,
            headers,
        }
    }

    /// Take the uri and headers out of `parts` for signing.
    ///
    /// Fails when the uri has no authority.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq.query().map(parse_query).transpose()?.unwrap_or_default(),

            headers: mem::take(&mut parts.headers),
        })
    }

    /// Write method, uri and headers back into `parts`.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method.clone();
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme.clone());
            uri_parts.authority = Some(self.authority.clone());
            uri_parts.path_and_query = Some(PathAndQuery::from_str(&self.path_and_query())?);
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Render `path?query` as it goes on the wire.
    pub fn path_and_query(&self) -> String {
        let mut s = String::with_capacity(self.path.len() + self.query_size() + 1);
        s.push_str(&self.path);

        for (i, (k, v)) in self.query.iter().enumerate() {
            s.push(if i == 0 { '?' } else { '&' });
            s.push_str(k);
            s.push('=');
            s.push_str(v);
        }

        s
    }

    /// Render the absolute url of this request.
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.authority, self.path_and_query())
    }

    /// Bytes the rendered query takes, separators included.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.len() + 2)
            .sum::<usize>()
    }

    /// Append a query pair after the existing ones.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Lowercase header names in ascending order.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }
}

/// Split a raw query string into decoded pairs.
///
/// `+` is kept literally: only `%XX` sequences are decoded.
fn parse_query(query: &str) -> Result<Vec<(String, String)>> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| -> Result<(String, String)> {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((
                percent_decode_str(k).decode_utf8()?.into_owned(),
                percent_decode_str(v).decode_utf8()?.into_owned(),
            ))
        })
        .collect()
}

/// Where the signature is carried.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigningMethod {
    /// `Authorization` header.
    Header,
    /// Signing with query, valid for the given duration.
    Query(Duration),
}
