//! String-to-sign, signing key and signature.

use std::fmt;

use cloudsign_core::hash::{hex_hmac_sha256, hmac_sha256};
use cloudsign_core::time::{format_date, format_iso8601, DateTime};

use crate::canonical::CanonicalRequest;
use crate::constants::{ALGORITHM, SCOPE_TERMINATOR, SECRET_KEY_PREFIX};
use crate::Credential;

/// CredentialScope narrows a signature to one date, region and service.
///
/// Rendered as `20130524/us-east-1/s3/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope<'a> {
    date: String,
    region: &'a str,
    service: &'a str,
}

impl<'a> CredentialScope<'a> {
    /// Build the scope for a signing time.
    pub fn new(time: DateTime, region: &'a str, service: &'a str) -> Self {
        Self {
            date: format_date(time),
            region,
            service,
        }
    }

    /// Date part in `YYYYMMDD`.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Region part.
    pub fn region(&self) -> &str {
        self.region
    }

    /// Service part.
    pub fn service(&self) -> &str {
        self.service
    }
}

impl fmt::Display for CredentialScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.date, self.region, self.service, SCOPE_TERMINATOR
        )
    }
}

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(creq: &CanonicalRequest, scope: &CredentialScope<'_>, time: DateTime) -> String {
    format!(
        "{ALGORITHM}\n{}\n{}\n{}",
        format_iso8601(time),
        scope,
        creq.hash()
    )
}

/// Derive the signing key for a scope.
///
/// Each step keys the next HMAC, so the result is only good for one
/// date/region/service triple.
pub fn generate_signing_key(secret: &str, scope: &CredentialScope<'_>) -> Vec<u8> {
    // Sign secret
    let secret = format!("{SECRET_KEY_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), scope.date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), scope.region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), scope.service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), SCOPE_TERMINATOR.as_bytes())
}

/// Lower-case hex HMAC of the string to sign.
pub fn calculate_signature(signing_key: &[u8], string_to_sign: &str) -> String {
    hex_hmac_sha256(signing_key, string_to_sign.as_bytes())
}

/// Sign a canonical request.
///
/// The session token never takes part here: it travels as a header or a
/// query parameter and is covered by the canonical request instead.
pub fn sign(
    creq: &CanonicalRequest,
    credential: &Credential,
    scope: &CredentialScope<'_>,
    time: DateTime,
) -> String {
    let signing_key = generate_signing_key(&credential.secret_access_key, scope);
    calculate_signature(&signing_key, &string_to_sign(creq, scope, time))
}
