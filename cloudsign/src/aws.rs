//! AWS Signature Version 4 support.

pub use cloudsign_aws_v4::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Result};

/// Create a [`Client`] for `service` in `region` using the default context.
///
/// Credentials are taken from the process environment once, when the
/// client is built.
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> cloudsign::Result<()> {
/// use cloudsign::aws::{default_client, Service};
/// use std::time::Duration;
///
/// let client = default_client(Service::S3, "us-east-1")
///     .await?
///     .with_endpoint("examplebucket.s3.amazonaws.com")?;
/// let url = client.presign(
///     http::Method::GET,
///     "/test.txt",
///     Vec::<(String, String)>::new(),
///     Duration::from_secs(3600),
/// )?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub async fn default_client(service: Service, region: &str) -> Result<Client> {
    let ctx = default_context();
    let config = Config::default().with_region(region).from_env(&ctx);
    Client::from_config(ctx, service, config).await
}
