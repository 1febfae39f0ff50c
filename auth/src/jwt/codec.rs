use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccessClaims;
use super::errors::TokenError;

/// Fixed access token validity window.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Encoder/decoder for locally issued access tokens.
///
/// Uses HS256 with a shared secret. Issuer and audience expectations are
/// optional: an empty configured value means the corresponding claim check
/// is skipped, not that it always fails.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: Option<String>,
    audience: Option<String>,
}

impl TokenCodec {
    /// Create a codec signing with the given shared secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: None,
            audience: None,
        }
    }

    /// Expect (and stamp) an issuer claim. Empty values are ignored.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        if !issuer.is_empty() {
            self.issuer = Some(issuer);
        }
        self
    }

    /// Expect (and stamp) an audience claim. Empty values are ignored.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        let audience = audience.into();
        if !audience.is_empty() {
            self.audience = Some(audience);
        }
        self
    }

    /// Issue a signed access token for a user.
    ///
    /// Claims carry `iat = now` and `exp = now + 24h` (fixed window, not
    /// configurable per call). The expiry instant is returned alongside
    /// the token so callers can surface it to clients.
    ///
    /// # Errors
    /// * `EncodingFailed` - signing failed
    pub fn issue(
        &self,
        user_id: &str,
        email: Option<&str>,
        role: &str,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(TOKEN_TTL_HOURS);

        let claims = AccessClaims {
            sub: user_id.to_string(),
            user_id: Some(user_id.to_string()),
            email: email.map(|e| e.to_string()),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok((token, expires_at))
    }

    /// Decode and validate an access token.
    ///
    /// # Errors
    /// * `Expired` - the token's `exp` is in the past
    /// * `Invalid` - signature mismatch, malformed structure, or
    ///   issuer/audience mismatch when those checks are enabled
    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
        decode_claims(
            token,
            &self.decoding_key,
            self.algorithm,
            self.issuer.as_deref(),
            self.audience.as_deref(),
        )
    }
}

/// Decode a token into `AccessClaims` with the given key and expectations.
///
/// Shared by the codec (shared-secret mode) and the key-set client
/// (asymmetric mode) so both report the same error taxonomy.
pub(crate) fn decode_claims(
    token: &str,
    key: &DecodingKey,
    algorithm: Algorithm,
    issuer: Option<&str>,
    audience: Option<&str>,
) -> Result<AccessClaims, TokenError> {
    let mut validation = Validation::new(algorithm);
    validation.validate_aud = false;
    if let Some(iss) = issuer {
        validation.set_issuer(&[iss]);
    }
    if let Some(aud) = audience {
        validation.set_audience(&[aud]);
        validation.validate_aud = true;
    }

    let token_data = decode::<AccessClaims>(token, key, &validation).map_err(|e| {
        if matches!(e.kind(), ErrorKind::ExpiredSignature) {
            TokenError::Expired
        } else {
            TokenError::Invalid(e.to_string())
        }
    })?;

    Ok(token_data.claims)
}
