use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use jsonwebtoken::decode_header;
use jsonwebtoken::jwk::AlgorithmParameters;
use jsonwebtoken::jwk::Jwk;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::jwk::KeyAlgorithm;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;

use super::errors::KeySetError;
use crate::jwt::claims::AccessClaims;
use crate::jwt::codec::decode_claims;
use crate::jwt::errors::TokenError;

/// Default key-set cache TTL (1 hour).
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Key-set fetch timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of remote key sets.
///
/// Abstracted so the cache and verification logic can be exercised with
/// scripted fetchers instead of a live endpoint.
#[async_trait]
pub trait KeySetFetcher: Send + Sync + 'static {
    async fn fetch(&self) -> Result<JwkSet, KeySetError>;
}

/// HTTP fetcher for a published JWKS endpoint.
pub struct HttpKeySetFetcher {
    jwks_url: String,
    client: reqwest::Client,
}

impl HttpKeySetFetcher {
    pub fn new(jwks_url: impl Into<String>) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl KeySetFetcher for HttpKeySetFetcher {
    async fn fetch(&self) -> Result<JwkSet, KeySetError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| KeySetError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(KeySetError::Fetch(format!(
                "HTTP {} from key-set endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| KeySetError::Fetch(e.to_string()))
    }
}

/// Cached key set with its fetch instant.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// Remote key-set client with caching and stale-on-error fallback.
///
/// The cache is a single cell: absent, or a key set with its fetch
/// instant. A fresh entry is served without any network call. When a
/// refresh fails and a previous entry exists (even expired), the stale
/// entry is served instead of the error. Concurrent refreshes may both
/// fetch and both write; entries are interchangeable, so last writer wins.
#[derive(Clone)]
pub struct KeySetClient {
    fetcher: Arc<dyn KeySetFetcher>,
    cache_ttl: Duration,
    cache: Arc<RwLock<Option<CacheEntry>>>,
    algorithm: Algorithm,
    issuer: Option<String>,
    audience: Option<String>,
}

impl KeySetClient {
    /// Create a client fetching from the given JWKS URL.
    pub fn new(jwks_url: impl Into<String>) -> Self {
        Self::with_fetcher(Arc::new(HttpKeySetFetcher::new(jwks_url)))
    }

    /// Create a client with a custom fetcher implementation.
    pub fn with_fetcher(fetcher: Arc<dyn KeySetFetcher>) -> Self {
        Self {
            fetcher,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(None)),
            algorithm: Algorithm::RS256,
            issuer: None,
            audience: None,
        }
    }

    /// Override the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Expected signature algorithm for keys that do not declare one.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Expected issuer claim. Empty values are ignored.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        if !issuer.is_empty() {
            self.issuer = Some(issuer);
        }
        self
    }

    /// Expected audience claim. Empty values are ignored.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        let audience = audience.into();
        if !audience.is_empty() {
            self.audience = Some(audience);
        }
        self
    }

    /// Get the key set, consulting the cache first.
    ///
    /// A fresh cache entry returns without I/O. On miss or expiry the set
    /// is refetched; on fetch failure a stale entry is served when one
    /// exists, otherwise the fetch error propagates.
    pub async fn key_set(&self) -> Result<JwkSet, KeySetError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(entry.jwks.clone());
                }
            }
        }

        match self.fetcher.fetch().await {
            Ok(jwks) => {
                let mut cache = self.cache.write().await;
                *cache = Some(CacheEntry {
                    jwks: jwks.clone(),
                    fetched_at: Instant::now(),
                });
                tracing::info!("key-set cache refreshed");
                Ok(jwks)
            }
            Err(e) => {
                let cache = self.cache.read().await;
                if let Some(entry) = &*cache {
                    tracing::warn!(error = %e, "key-set fetch failed, serving stale cache");
                    return Ok(entry.jwks.clone());
                }
                Err(e)
            }
        }
    }

    /// Verify a token against the remote key set.
    ///
    /// The unverified token header selects the key by `kid`. When no key
    /// matches, the first key in the set is tried as a best-effort
    /// recovery for rotation windows; delete that fallback to fail closed
    /// instead. An empty set is `NoSigningKey`.
    pub async fn verify(&self, token: &str) -> Result<AccessClaims, KeySetError> {
        let jwks = self.key_set().await?;

        let header =
            decode_header(token).map_err(|e| TokenError::Invalid(e.to_string()))?;

        let jwk = match header.kid.as_deref() {
            Some(kid) => jwks
                .keys
                .iter()
                .find(|k| k.common.key_id.as_deref() == Some(kid))
                .or_else(|| jwks.keys.first()),
            None => jwks.keys.first(),
        }
        .ok_or(KeySetError::NoSigningKey)?;

        let (decoding_key, algorithm) = self.decoding_key_for(jwk)?;

        let claims = decode_claims(
            token,
            &decoding_key,
            algorithm,
            self.issuer.as_deref(),
            self.audience.as_deref(),
        )?;

        Ok(claims)
    }

    /// Drop any cached key set, returning the cache to its initial state.
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }

    /// Whether a fresh (unexpired) key set is currently cached.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        match &*cache {
            Some(entry) => entry.fetched_at.elapsed() < self.cache_ttl,
            None => false,
        }
    }

    /// Convert a JWK into a decoding key plus the algorithm to verify with.
    fn decoding_key_for(&self, jwk: &Jwk) -> Result<(DecodingKey, Algorithm), KeySetError> {
        match &jwk.algorithm {
            AlgorithmParameters::RSA(rsa) => {
                let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                    .map_err(|e| KeySetError::UnsupportedKey(e.to_string()))?;

                let algorithm = match jwk.common.key_algorithm {
                    Some(KeyAlgorithm::RS256) => Algorithm::RS256,
                    Some(KeyAlgorithm::RS384) => Algorithm::RS384,
                    Some(KeyAlgorithm::RS512) => Algorithm::RS512,
                    _ => self.algorithm,
                };
                Ok((key, algorithm))
            }
            AlgorithmParameters::EllipticCurve(ec) => {
                let key = DecodingKey::from_ec_components(&ec.x, &ec.y)
                    .map_err(|e| KeySetError::UnsupportedKey(e.to_string()))?;

                let algorithm = match jwk.common.key_algorithm {
                    Some(KeyAlgorithm::ES384) => Algorithm::ES384,
                    _ => Algorithm::ES256,
                };
                Ok((key, algorithm))
            }
            other => Err(KeySetError::UnsupportedKey(format!("{:?}", other))),
        }
    }
}
