use crate::{Context, Result, SigningMethod, SigningRequest};
use std::fmt::Debug;

/// SigningCredential is the trait used by signer as the signing key.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential carries every field signing needs.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used to take a credential snapshot from
/// the environment.
///
/// Providers are consulted once, when a client is built. The snapshot is then
/// used unchanged for the client's lifetime.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this loader.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load credential from current env.
    ///
    /// Returns `Ok(None)` when this provider has nothing to offer, so that a
    /// chain can move on to the next one.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest is the trait used by signer to sign the request.
///
/// Signing is a pure computation: implementations must not block, perform
/// I/O, or keep state between calls.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this builder.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request in place.
    ///
    /// ## Body
    ///
    /// `body` is the exact payload that will be sent. It is hashed when the
    /// signing method covers the payload.
    ///
    /// ## Method
    ///
    /// [`SigningMethod::Header`] attaches the signature as headers, while
    /// [`SigningMethod::Query`] produces a presigned url valid for the given
    /// duration. Implementations that cannot express an expiry must return an
    /// error for the latter.
    fn sign_request(
        &self,
        req: &mut SigningRequest,
        body: &[u8],
        credential: &Self::Credential,
        method: SigningMethod,
    ) -> Result<()>;
}
