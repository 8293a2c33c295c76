use super::*;
use anyhow::Result;
use cloudsign_aws_v4::{RequestBuilder, UriEncoding};
use cloudsign_core::SigningMethod;
use http::{HeaderMap, Method, Request, StatusCode};
use log::warn;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case("/photos/a b.jpg", "/photos/a%20b.jpg"; "space")]
#[test_case("/test$file.text", "/test%24file.text"; "dollar")]
#[test_case("/!@#$%^&*()_+-=;:'><,.txt", "/%21%40%23%24%25%5E%26%2A%28%29_%2B-%3D%3B%3A%27%3E%3C%2C.txt"; "punctuation")]
#[test_case("/文件/データ.txt", "/%E6%96%87%E4%BB%B6/%E3%83%87%E3%83%BC%E3%82%BF.txt"; "non ascii")]
fn test_builder_encodes_path_once(raw: &str, wire: &str) -> Result<()> {
    let req = RequestBuilder::new(s3_signer()).build_request(
        Method::GET,
        "examplebucket.s3.amazonaws.com",
        raw,
        Vec::<(String, String)>::new(),
        b"",
        HeaderMap::new(),
        SigningMethod::Header,
    )?;

    assert_eq!(req.url, format!("https://examplebucket.s3.amazonaws.com{wire}"));
    Ok(())
}

#[test]
fn test_raw_and_encoded_paths_sign_alike() -> Result<()> {
    let signer = s3_signer();
    let build = |uri: &str| Request::builder().uri(uri).body(Vec::new()).unwrap();

    let encoded = sign(
        &signer,
        build("https://examplebucket.s3.amazonaws.com/test%24file.text"),
        SigningMethod::Header,
    )?;
    let raw = sign(
        &signer,
        build("https://examplebucket.s3.amazonaws.com/test$file.text"),
        SigningMethod::Header,
    )?;

    assert_eq!(signature_of(&encoded), signature_of(&raw));
    Ok(())
}

#[test]
fn test_double_encoding_changes_signature() -> Result<()> {
    let single = signer_for(&Service::S3, "us-east-1");
    let double = Signer::new(
        example_credential(),
        RequestSigner::for_service(&Service::S3, "us-east-1")
            .with_uri_encoding(UriEncoding::DOUBLE)
            .with_time(example_time()),
    )?;
    let build = || {
        Request::builder()
            .uri("https://examplebucket.s3.amazonaws.com/a%20b.txt")
            .body(Vec::new())
            .unwrap()
    };

    let a = sign(&single, build(), SigningMethod::Header)?;
    let b = sign(&double, build(), SigningMethod::Header)?;
    assert_ne!(signature_of(&a), signature_of(&b));

    // Paths without reserved bytes are the same under both policies.
    let plain = || {
        Request::builder()
            .uri("https://examplebucket.s3.amazonaws.com/test.txt")
            .body(Vec::new())
            .unwrap()
    };
    let a = sign(&single, plain(), SigningMethod::Header)?;
    let b = sign(&double, plain(), SigningMethod::Header)?;
    assert_eq!(signature_of(&a), signature_of(&b));
    Ok(())
}

#[test]
fn test_query_special_characters() -> Result<()> {
    let req = RequestBuilder::new(s3_signer()).build_request(
        Method::GET,
        "examplebucket.s3.amazonaws.com",
        "/",
        [
            ("prefix", "a b+c/d"),
            ("marker", "~-._"),
            ("unicode", "ü"),
            ("empty", ""),
        ],
        b"",
        HeaderMap::new(),
        SigningMethod::Header,
    )?;

    assert_eq!(
        req.url,
        "https://examplebucket.s3.amazonaws.com/?empty=&marker=~-._&prefix=a%20b%2Bc%2Fd&unicode=%C3%BC"
    );
    Ok(())
}

#[test]
fn test_plus_in_query_is_literal() -> Result<()> {
    let signer = s3_signer();
    let build = |uri: &str| Request::builder().uri(uri).body(Vec::new()).unwrap();

    let plus = sign(
        &signer,
        build("https://examplebucket.s3.amazonaws.com/?prefix=a+b"),
        SigningMethod::Header,
    )?;
    let space = sign(
        &signer,
        build("https://examplebucket.s3.amazonaws.com/?prefix=a%20b"),
        SigningMethod::Header,
    )?;

    assert_eq!(plus.uri().query(), Some("prefix=a%2Bb"));
    assert_ne!(signature_of(&plus), signature_of(&space));
    Ok(())
}

#[tokio::test]
async fn test_head_object_with_special_characters() -> Result<()> {
    let Some((client, prefix)) = init_live_test() else {
        warn!("CLOUDSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = client.build_request(
        Method::HEAD,
        &format!("{prefix}/!@#$%^&*()_+-=;:'><,/?.txt"),
        Vec::<(String, String)>::new(),
        b"",
        HeaderMap::new(),
        SigningMethod::Header,
    )?;

    let err = client
        .send("HeadObject", req, Vec::new())
        .await
        .expect_err("object must not exist");
    let source = err
        .source_as::<cloudsign_aws_v4::ServiceError>()
        .expect("must keep source");
    assert_eq!(source.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_head_object_with_encoded_characters() -> Result<()> {
    let Some((client, prefix)) = init_live_test() else {
        warn!("CLOUDSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    // The name itself contains `%XX` sequences.
    let name = utf8_percent_encode("!@#$%^&*()_+-=;:'><,/?.txt", NON_ALPHANUMERIC).to_string();
    let req = client.build_request(
        Method::HEAD,
        &format!("{prefix}/{name}"),
        Vec::<(String, String)>::new(),
        b"",
        HeaderMap::new(),
        SigningMethod::Header,
    )?;

    let err = client
        .send("HeadObject", req, Vec::new())
        .await
        .expect_err("object must not exist");
    assert_eq!(err.kind(), cloudsign_core::ErrorKind::ServiceRejected);
    Ok(())
}
