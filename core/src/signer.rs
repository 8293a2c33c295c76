use crate::{
    Context, Error, ProvideCredential, Result, SignRequest, SigningCredential, SigningMethod,
    SigningRequest,
};
use std::sync::Arc;

/// Signer pairs a credential snapshot with a request signer.
///
/// The credential is taken once, at construction, and never refreshed.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    credential: K,
    builder: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer from a credential snapshot.
    ///
    /// Returns an error if the credential is missing required fields.
    pub fn new(credential: K, builder: impl SignRequest<Credential = K>) -> Result<Self> {
        if !credential.is_valid() {
            return Err(Error::credential_invalid(
                "credential is missing required fields",
            ));
        }

        Ok(Self {
            credential,
            builder: Arc::new(builder),
        })
    }

    /// Create a new signer by asking the provider for a credential snapshot.
    pub async fn from_provider(
        ctx: &Context,
        provider: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Result<Self> {
        let credential = provider
            .provide_credential(ctx)
            .await?
            .ok_or_else(|| Error::credential_invalid("no credential found"))?;

        Self::new(credential, builder)
    }

    /// The credential this signer signs with.
    pub fn credential(&self) -> &K {
        &self.credential
    }

    /// Sign a signing request in place.
    pub fn sign_request(
        &self,
        req: &mut SigningRequest,
        body: &[u8],
        method: SigningMethod,
    ) -> Result<()> {
        self.builder
            .sign_request(req, body, &self.credential, method)
    }

    /// Sign an `http` request in place.
    pub fn sign(
        &self,
        parts: &mut http::request::Parts,
        body: &[u8],
        method: SigningMethod,
    ) -> Result<()> {
        let mut req = SigningRequest::build(parts)?;
        self.sign_request(&mut req, body, method)?;
        req.apply(parts)
    }
}
