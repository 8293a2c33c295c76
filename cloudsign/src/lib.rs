//! Signing cloud API requests with AWS Signature Version 4.
//!
//! This crate glues [`cloudsign_core`] and the protocol crates together.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> cloudsign::Result<()> {
//! use cloudsign::aws::Service;
//!
//! let client = cloudsign::aws::default_client(Service::SSM, "us-east-1").await?;
//! let req = client.json_request("DescribeParameters", b"{}")?;
//! println!("{}", req.url);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use cloudsign_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

#[cfg(feature = "aws")]
pub mod aws;
