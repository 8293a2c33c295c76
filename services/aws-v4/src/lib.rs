//! AWS Signature Version 4 for cloudsign.
//!
//! This crate signs requests for AWS style APIs, either with an
//! `Authorization` header or as a presigned url, and maps service error
//! responses into typed errors.
//!
//! ## Example
//!
//! ```no_run
//! use cloudsign_aws_v4::{Client, Credential, Service};
//! use cloudsign_core::{Context, Result};
//! use std::time::Duration;
//!
//! # fn main() -> Result<()> {
//! let client = Client::new(
//!     Context::new(),
//!     Service::S3,
//!     "us-east-1",
//!     Credential::new("access_key_id", "secret_access_key"),
//! )?
//! .with_endpoint("examplebucket.s3.amazonaws.com")?;
//!
//! let url = client.presign(
//!     http::Method::GET,
//!     "/test.txt",
//!     Vec::<(String, String)>::new(),
//!     Duration::from_secs(3600),
//! )?;
//! println!("{url}");
//! # Ok(())
//! # }
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

pub mod canonical;
pub mod sign;
pub mod uri;
pub use uri::UriEncoding;

mod sign_request;
pub use sign_request::RequestSigner;

mod service;
pub use service::{Protocol, Service};

mod build;
pub use build::{RequestBuilder, SignedRequest};

mod error;
pub use error::{classify, classify_response, ServiceError};

mod client;
pub use client::Client;
