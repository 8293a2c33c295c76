//! Presign an S3 GET url from credentials in the environment.
//!
//! ```shell
//! AWS_REGION=us-east-1 cargo run --example s3_presign -- my-bucket path/to/key
//! ```

use std::time::Duration;

use cloudsign_aws_v4::{Client, Config, Service};
use cloudsign_core::{Context, OsEnv};
use http::Method;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let bucket = args.next().unwrap_or_else(|| "examplebucket".to_string());
    let key = args.next().unwrap_or_else(|| "test.txt".to_string());

    let ctx = Context::new().with_env(OsEnv);
    let config = Config::default().from_env(&ctx);
    let region = config.region()?.to_string();

    let client = Client::from_config(ctx, Service::S3, config)
        .await?
        .with_endpoint(&format!("{bucket}.s3.{region}.amazonaws.com"))?;

    let url = client.presign(
        Method::GET,
        &format!("/{key}"),
        Vec::<(String, String)>::new(),
        Duration::from_secs(3600),
    )?;
    println!("{url}");

    Ok(())
}
