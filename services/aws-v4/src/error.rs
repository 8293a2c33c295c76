//! Mapping service responses into typed errors.

use http::{HeaderMap, StatusCode};
use quick_xml::de;
use serde::Deserialize;

use cloudsign_core::ErrorKind;

use crate::constants::X_AMZN_ERRORTYPE;

/// Error codes a service returns when it rejects how a request was signed.
const SIGNATURE_ERROR_CODES: &[&str] = &[
    "SignatureDoesNotMatch",
    "InvalidSignatureException",
    "IncompleteSignature",
    "IncompleteSignatureException",
    "MissingAuthenticationToken",
    "RequestTimeTooSkewed",
    "InvalidClientTokenId",
    "AuthorizationHeaderMalformed",
];

/// JSON fields that may carry the message, in lookup order.
const JSON_MESSAGE_FIELDS: &[&str] = &["message", "Message", "errorMessage", "error_message"];

/// JSON fields that may carry the error code, in lookup order.
const JSON_CODE_FIELDS: &[&str] = &["__type", "code", "Code"];

/// ServiceError is a failure reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service rejected the signature.
    ///
    /// Usually means the request was canonicalized differently from the
    /// way the service expects, or the clock is skewed.
    #[error("{service} {operation} rejected the request signature: {code}: {message}")]
    InvalidSignature {
        /// Service name.
        service: String,
        /// Operation that failed.
        operation: String,
        /// Response status.
        status: StatusCode,
        /// Error subtype reported by the service.
        code: String,
        /// Message reported by the service.
        message: String,
    },
    /// Any other error reported by the service.
    #[error("{service} {operation} failed: {code}: {message}")]
    Service {
        /// Service name.
        service: String,
        /// Operation that failed.
        operation: String,
        /// Response status.
        status: StatusCode,
        /// Error code reported by the service.
        code: String,
        /// Message reported by the service.
        message: String,
    },
    /// The service failed internally.
    #[error("{service} {operation} failed with server error {status}")]
    Internal {
        /// Service name.
        service: String,
        /// Operation that failed.
        operation: String,
        /// Response status.
        status: StatusCode,
    },
}

impl ServiceError {
    /// The operation that failed.
    pub fn operation(&self) -> &str {
        match self {
            ServiceError::InvalidSignature { operation, .. }
            | ServiceError::Service { operation, .. }
            | ServiceError::Internal { operation, .. } => operation,
        }
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidSignature { status, .. }
            | ServiceError::Service { status, .. }
            | ServiceError::Internal { status, .. } => *status,
        }
    }

    /// Error code reported by the service, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            ServiceError::InvalidSignature { code, .. } | ServiceError::Service { code, .. } => {
                Some(code)
            }
            ServiceError::Internal { .. } => None,
        }
    }

    /// Message reported by the service, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ServiceError::InvalidSignature { message, .. }
            | ServiceError::Service { message, .. } => Some(message),
            ServiceError::Internal { .. } => None,
        }
    }

    /// Returns true if the service rejected the signature.
    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, ServiceError::InvalidSignature { .. })
    }

    fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidSignature { .. } => ErrorKind::SignatureRejected,
            ServiceError::Service { .. } => ErrorKind::ServiceRejected,
            ServiceError::Internal { .. } => ErrorKind::ServiceUnavailable,
        }
    }
}

impl From<ServiceError> for cloudsign_core::Error {
    fn from(err: ServiceError) -> Self {
        cloudsign_core::Error::new(err.kind(), err.to_string()).with_source(err)
    }
}

/// Classify a response by status and body.
pub fn classify(
    service: &str,
    operation: &str,
    status: StatusCode,
    body: &[u8],
) -> Result<(), ServiceError> {
    classify_response(service, operation, status, &HeaderMap::new(), body)
}

/// Classify a response, also looking at the `x-amzn-errortype` header.
///
/// - 2xx and `304 Not Modified` are success.
/// - 5xx is [`ServiceError::Internal`].
/// - 4xx with a code from the signature failure set is
///   [`ServiceError::InvalidSignature`].
/// - everything else is [`ServiceError::Service`].
pub fn classify_response(
    service: &str,
    operation: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), ServiceError> {
    if status.is_success() || status == StatusCode::NOT_MODIFIED {
        return Ok(());
    }
    if status.is_server_error() {
        return Err(ServiceError::Internal {
            service: service.to_string(),
            operation: operation.to_string(),
            status,
        });
    }

    let detail = ErrorDetail::parse(headers, body);
    let code = detail
        .code
        .or_else(|| status.canonical_reason().map(|v| v.replace(' ', "")))
        .unwrap_or_else(|| status.as_str().to_string());
    let message = detail.message.unwrap_or_else(|| code.clone());

    if status.is_client_error() && SIGNATURE_ERROR_CODES.contains(&code.as_str()) {
        return Err(ServiceError::InvalidSignature {
            service: service.to_string(),
            operation: operation.to_string(),
            status,
            code,
            message,
        });
    }

    Err(ServiceError::Service {
        service: service.to_string(),
        operation: operation.to_string(),
        status,
        code,
        message,
    })
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

impl ErrorDetail {
    fn parse(headers: &HeaderMap, body: &[u8]) -> Self {
        let mut detail = Self::from_json(body)
            .or_else(|| Self::from_xml(body))
            .unwrap_or_default();

        if detail.code.is_none() {
            detail.code = headers
                .get(X_AMZN_ERRORTYPE)
                .and_then(|v| v.to_str().ok())
                .map(short_error_type)
                .filter(|v| !v.is_empty());
        }
        detail
    }

    fn from_json(body: &[u8]) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        let obj = value.as_object()?;
        let lookup = |fields: &[&str]| {
            fields
                .iter()
                .find_map(|f| obj.get(*f).and_then(|v| v.as_str()))
                .filter(|v| !v.is_empty())
        };

        Some(Self {
            code: lookup(JSON_CODE_FIELDS).map(short_error_type),
            message: lookup(JSON_MESSAGE_FIELDS).map(str::to_string),
        })
    }

    fn from_xml(body: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(body).ok()?;
        if !text.trim_start().starts_with('<') {
            return None;
        }

        // S3 answers `<Error>`, query protocols wrap it in `<ErrorResponse>`.
        if let Ok(err) = de::from_str::<XmlError>(text) {
            if err.code.is_some() {
                return Some(err.into());
            }
        }
        let resp = de::from_str::<XmlErrorResponse>(text).ok()?;
        Some(resp.error.into())
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct XmlError {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct XmlErrorResponse {
    error: XmlError,
}

impl From<XmlError> for ErrorDetail {
    fn from(err: XmlError) -> Self {
        Self {
            code: err.code.filter(|v| !v.is_empty()),
            message: err.message.filter(|v| !v.is_empty()),
        }
    }
}

/// Strip namespaces and trailing details from an error type.
///
/// `com.amazonaws.kms#NotFoundException` and
/// `InvalidSignatureException:http://internal.amazon.com/` both become the
/// bare type name.
fn short_error_type(v: &str) -> String {
    let v = v.rsplit_once('#').map_or(v, |(_, t)| t);
    let v = v.split_once(':').map_or(v, |(t, _)| t);
    v.trim().to_string()
}
