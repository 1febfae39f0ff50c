use crate::jwks::KeySetClient;
use crate::jwks::KeySetError;
use crate::jwt::AccessClaims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;

/// Error type for orchestrated token verification.
///
/// Failure is normalized so clients never learn which verification stage
/// rejected the token. The expired case stays distinct where a stage
/// could determine it (valid signature, `exp` in the past); internal logs
/// carry the per-stage reasons.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VerificationError {
    #[error("Token has expired")]
    Expired,

    #[error("Token verification failed")]
    Failed,
}

/// One way of verifying a token, as a first-class value.
///
/// The verifier tries its strategies in order, so a strategy list is the
/// whole verification policy: which issuers are accepted and in which
/// order they are consulted.
pub enum VerificationStrategy {
    /// Shared-secret (HS256) verification of locally issued tokens.
    SharedSecret(TokenCodec),
    /// Remote key-set verification of externally issued tokens.
    RemoteKeySet(KeySetClient),
}

impl VerificationStrategy {
    async fn verify(&self, token: &str) -> Result<AccessClaims, VerificationError> {
        match self {
            VerificationStrategy::SharedSecret(codec) => {
                codec.decode(token).map_err(|e| stage_error("shared-secret", e))
            }
            VerificationStrategy::RemoteKeySet(client) => match client.verify(token).await {
                Ok(claims) => Ok(claims),
                Err(KeySetError::Token(e)) => Err(stage_error("remote-key-set", e)),
                Err(e) => {
                    tracing::warn!(stage = "remote-key-set", error = %e, "verification stage failed");
                    Err(VerificationError::Failed)
                }
            },
        }
    }

    fn name(&self) -> &'static str {
        match self {
            VerificationStrategy::SharedSecret(_) => "shared-secret",
            VerificationStrategy::RemoteKeySet(_) => "remote-key-set",
        }
    }
}

fn stage_error(stage: &'static str, e: TokenError) -> VerificationError {
    tracing::debug!(stage, error = %e, "verification stage rejected token");
    match e {
        TokenError::Expired => VerificationError::Expired,
        _ => VerificationError::Failed,
    }
}

/// Multi-issuer token verifier.
///
/// Tries shared-secret verification first so tokens issued by this
/// backend validate without a network round trip, then (when configured)
/// falls back to the remote key set for tokens issued by an external
/// identity provider. The order is a compatibility bridge between the two
/// issuers, not a resilience mechanism, so it is significant: the cheap
/// local check always runs first.
pub struct TokenVerifier {
    strategies: Vec<VerificationStrategy>,
}

impl TokenVerifier {
    /// Build a verifier from an explicit strategy list.
    pub fn new(strategies: Vec<VerificationStrategy>) -> Self {
        Self { strategies }
    }

    /// Standard two-stage configuration: local shared secret, then an
    /// optional remote key set.
    pub fn with_shared_secret(codec: TokenCodec, remote: Option<KeySetClient>) -> Self {
        let mut strategies = vec![VerificationStrategy::SharedSecret(codec)];
        if let Some(client) = remote {
            strategies.push(VerificationStrategy::RemoteKeySet(client));
        }
        Self { strategies }
    }

    /// Verify a token against each strategy in order.
    ///
    /// # Errors
    /// * `Expired` - some stage determined the token is valid but expired
    /// * `Failed` - every stage rejected the token
    pub async fn verify(&self, token: &str) -> Result<AccessClaims, VerificationError> {
        let mut expired = false;

        for strategy in &self.strategies {
            match strategy.verify(token).await {
                Ok(claims) => return Ok(claims),
                Err(VerificationError::Expired) => expired = true,
                Err(VerificationError::Failed) => {}
            }
            tracing::debug!(stage = strategy.name(), "trying next verification stage");
        }

        if expired {
            Err(VerificationError::Expired)
        } else {
            Err(VerificationError::Failed)
        }
    }
}
