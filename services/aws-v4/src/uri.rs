//! URI encoding policy for canonical paths.

use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;

use cloudsign_core::{Error, Result};

use crate::constants::AWS_URI_ENCODE_SET;

/// UriEncoding controls how a request path turns into its canonical form.
///
/// S3 signs the path exactly as it goes on the wire, while most other
/// services expect the already-encoded path to be encoded a second time.
/// Getting this backwards is the most common cause of
/// `SignatureDoesNotMatch`, so it is always chosen explicitly per service.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UriEncoding {
    /// Percent-encode the already-encoded path once more.
    pub double_encode_path: bool,
    /// Sign an empty path as `/`.
    pub normalize_empty_path: bool,
}

impl Default for UriEncoding {
    /// The general SigV4 rule: double encoding with `/` for empty paths.
    fn default() -> Self {
        Self::DOUBLE
    }
}

impl UriEncoding {
    /// Encode the path once, used by S3.
    pub const SINGLE: UriEncoding = UriEncoding {
        double_encode_path: false,
        normalize_empty_path: true,
    };

    /// Encode the path twice, used by every service except S3.
    pub const DOUBLE: UriEncoding = UriEncoding {
        double_encode_path: true,
        normalize_empty_path: true,
    };

    /// Encode a raw path into the form that goes on the wire.
    ///
    /// Every byte outside the unreserved set is escaped, `/` separates
    /// segments and is kept as is.
    pub fn encode_path(raw: &str) -> String {
        let encoded = utf8_percent_encode(raw, &AWS_URI_ENCODE_SET).to_string();
        if encoded.is_empty() || encoded.starts_with('/') {
            encoded
        } else {
            format!("/{encoded}")
        }
    }

    /// Build the canonical uri from a wire path.
    ///
    /// The wire path is decoded first, so that callers sending `%20` and
    /// callers sending a raw byte end up with the same canonical form.
    pub fn canonical_path(&self, path: &str) -> Result<String> {
        if path.is_empty() {
            return if self.normalize_empty_path {
                Ok("/".to_string())
            } else {
                Err(Error::request_invalid(
                    "unsupported encoding policy combination: empty path without normalization",
                ))
            };
        }

        let decoded = percent_decode_str(path).decode_utf8().map_err(|e| {
            Error::request_invalid(format!("path {path} is not valid utf-8 once decoded"))
                .with_source(e)
        })?;
        let once = utf8_percent_encode(&decoded, &AWS_URI_ENCODE_SET).to_string();

        if self.double_encode_path {
            Ok(utf8_percent_encode(&once, &AWS_URI_ENCODE_SET).to_string())
        } else {
            Ok(once)
        }
    }
}
