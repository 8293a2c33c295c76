//! Call SSM `DescribeParameters` through the json protocol.
//!
//! ```shell
//! AWS_REGION=us-east-1 RUST_LOG=debug cargo run --example ssm_json
//! ```

use cloudsign_aws_v4::{Client, Config, Service};
use cloudsign_core::{Context, OsEnv};
use cloudsign_http_send_reqwest::ReqwestHttpSend;
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());
    let config = Config::default().from_env(&ctx);

    let client = Client::from_config(ctx, Service::SSM, config).await?;

    match client
        .call_json::<_, Value>("DescribeParameters", &json!({ "MaxResults": 10 }))
        .await
    {
        Ok(out) => println!("{}", serde_json::to_string_pretty(&out)?),
        Err(err) if err.is_signature_rejected() => {
            eprintln!("signature rejected, check your credential: {err}");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
