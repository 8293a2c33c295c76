//! Core components for signing cloud API requests.
//!
//! This crate provides the foundational types and traits shared by the
//! cloudsign crates. It knows nothing about a particular signing protocol.
//!
//! ## Overview
//!
//! - **Context**: where configuration is read from ([`Env`]) and how signed
//!   requests are dispatched ([`HttpSend`]).
//! - **Traits**: [`ProvideCredential`] takes a credential snapshot,
//!   [`SignRequest`] signs a [`SigningRequest`] with it.
//! - **Signer**: binds one credential snapshot to one request signer.
//!
//! ## Example
//!
//! ```
//! use cloudsign_core::{Result, SignRequest, Signer, SigningCredential, SigningMethod, SigningRequest};
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyBuilder;
//!
//! impl SignRequest for MyBuilder {
//!     type Credential = MyCredential;
//!
//!     fn sign_request(
//!         &self,
//!         req: &mut SigningRequest,
//!         _body: &[u8],
//!         cred: &MyCredential,
//!         _method: SigningMethod,
//!     ) -> Result<()> {
//!         req.headers.insert("x-my-key", cred.key.parse()?);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let signer = Signer::new(MyCredential { key: "my-key".into() }, MyBuilder)?;
//!
//! let (mut parts, _) = http::Request::builder()
//!     .method("GET")
//!     .uri("https://example.com")
//!     .body(())?
//!     .into_parts();
//!
//! signer.sign(&mut parts, b"", SigningMethod::Header)?;
//! assert_eq!(parts.headers["x-my-key"], "my-key");
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: SHA-256 and HMAC-SHA256 helpers
//! - [`time`]: signing timestamp formats
//! - [`utils`]: redaction of secrets in debug output

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
mod http;
pub use self::http::HttpSend;
pub use self::http::NoopHttpSend;
mod env;
pub use env::Env;
pub use env::NoopEnv;
pub use env::OsEnv;
pub use env::StaticEnv;

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::{SigningMethod, SigningRequest};
mod signer;
pub use signer::Signer;
mod error;
pub use error::{Error, ErrorKind, Result};
