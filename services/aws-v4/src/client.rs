//! A generic client shared by every service profile.

use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::uri::Scheme;
use http::{HeaderMap, HeaderValue, Method, Uri};
use serde::de::DeserializeOwned;
use serde::Serialize;

use cloudsign_core::{Context, Error, Result, Signer, SigningMethod};

use crate::build::{RequestBuilder, SignedRequest};
use crate::constants::{JSON_1_1_CONTENT_TYPE, X_AMZ_TARGET};
use crate::error::{classify_response, ServiceError};
use crate::service::{Protocol, Service};
use crate::{Config, Credential, DefaultCredentialProvider, RequestSigner};

/// Client builds, signs and dispatches requests for one service in one
/// region.
///
/// The credential is a snapshot taken at construction. The client never
/// retries and never refreshes it.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    service: Service,
    builder: RequestBuilder,
    host: String,
}

impl Client {
    /// Create a client from an explicit credential.
    pub fn new(ctx: Context, service: Service, region: &str, credential: Credential) -> Result<Self> {
        let signer = Signer::new(credential, RequestSigner::for_service(&service, region))?;
        Ok(Self::from_signer(ctx, service, region, signer))
    }

    /// Create a client around a prepared signer.
    pub fn from_signer(
        ctx: Context,
        service: Service,
        region: &str,
        signer: Signer<Credential>,
    ) -> Self {
        Self {
            host: service.endpoint(region),
            builder: RequestBuilder::new(signer),
            service,
            ctx,
        }
    }

    /// Create a client from config, filling unset fields from env.
    ///
    /// Fails when region or credential can't be found.
    pub async fn from_config(ctx: Context, service: Service, config: Config) -> Result<Self> {
        let config = config.from_env(&ctx);
        let region = config.region()?.to_string();

        let signer = Signer::from_provider(
            &ctx,
            DefaultCredentialProvider::from_config(config.clone()),
            RequestSigner::for_service(&service, &region),
        )
        .await?;

        let client = Self::from_signer(ctx, service, &region, signer);
        match &config.endpoint {
            Some(endpoint) => client.with_endpoint(endpoint),
            None => Ok(client),
        }
    }

    /// Send requests to `endpoint` instead of the default host.
    ///
    /// Accepts `host[:port]` or a url like `http://127.0.0.1:4566`.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let uri = Uri::from_str(endpoint).map_err(|e| {
            Error::config_invalid(format!("endpoint {endpoint} is not a valid url")).with_source(e)
        })?;
        let authority = uri.authority().ok_or_else(|| {
            Error::config_invalid(format!("endpoint {endpoint} doesn't contain a host"))
        })?;

        self.host = authority.to_string();
        if let Some(scheme) = uri.scheme() {
            let scheme = match scheme.as_str() {
                "http" => Scheme::HTTP,
                "https" => Scheme::HTTPS,
                other => {
                    return Err(Error::config_invalid(format!(
                        "endpoint scheme {other} is not supported"
                    )))
                }
            };
            self.builder = self.builder.with_scheme(scheme);
        }
        Ok(self)
    }

    /// The service profile of this client.
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// The host requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Build and sign a request for this client's host.
    pub fn build_request<K, V>(
        &self,
        method: Method,
        path: &str,
        query: impl IntoIterator<Item = (K, V)>,
        body: &[u8],
        headers: HeaderMap,
        signing: SigningMethod,
    ) -> Result<SignedRequest>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.builder
            .build_request(method, &self.host, path, query, body, headers, signing)
    }

    /// Build and sign a json protocol call.
    pub fn json_request(&self, operation: &str, body: &[u8]) -> Result<SignedRequest> {
        let Protocol::Json { target_prefix } = self.service.protocol() else {
            return Err(Error::request_invalid(format!(
                "service {} doesn't speak the json protocol",
                self.service.signing_name()
            )));
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_1_1_CONTENT_TYPE));
        headers.insert(
            X_AMZ_TARGET,
            HeaderValue::from_str(&format!("{target_prefix}.{operation}"))?,
        );

        self.build_request(
            Method::POST,
            "/",
            Vec::<(String, String)>::new(),
            body,
            headers,
            SigningMethod::Header,
        )
    }

    /// Build a presigned url valid for `expires`.
    pub fn presign<K, V>(
        &self,
        method: Method,
        path: &str,
        query: impl IntoIterator<Item = (K, V)>,
        expires: Duration,
    ) -> Result<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let req = self.build_request(
            method,
            path,
            query,
            b"",
            HeaderMap::new(),
            SigningMethod::Query(expires),
        )?;
        Ok(req.url)
    }

    /// Classify a response of `operation`.
    pub fn classify_error(
        &self,
        operation: &str,
        resp: &http::Response<Bytes>,
    ) -> std::result::Result<(), ServiceError> {
        classify_response(
            self.service.signing_name(),
            operation,
            resp.status(),
            resp.headers(),
            resp.body(),
        )
    }

    /// Dispatch a signed request and classify the response.
    ///
    /// `body` must be the bytes the request was signed with.
    pub async fn send(
        &self,
        operation: &str,
        req: SignedRequest,
        body: impl Into<Bytes>,
    ) -> Result<http::Response<Bytes>> {
        let resp = self.ctx.http_send(req.into_http(body)?).await?;
        self.classify_error(operation, &resp)?;
        Ok(resp)
    }

    /// Call a json protocol operation.
    pub async fn call_json<I, O>(&self, operation: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let body = serde_json::to_vec(input).map_err(|e| {
            Error::request_invalid(format!("failed to serialize {operation} input")).with_source(e)
        })?;
        let req = self.json_request(operation, &body)?;
        let resp = self.send(operation, req, body).await?;

        serde_json::from_slice(resp.body()).map_err(|e| {
            Error::unexpected(format!("failed to parse {operation} output")).with_source(e)
        })
    }
}
