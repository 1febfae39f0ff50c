//! Authentication library
//!
//! Provides the authentication infrastructure shared by the backend:
//! - Password hashing with transparent legacy-scheme migration support
//! - JWT access token issuance and validation (HS256)
//! - Remote key-set (JWKS) verification with caching
//! - A multi-issuer token verifier combining both verification modes
//!
//! The service defines its own domain traits and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::TokenCodec;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let (token, _expires_at) = codec.issue("user123", Some("a@x.com"), "user").unwrap();
//! let claims = codec.decode(&token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod jwks;
pub mod jwt;
pub mod password;
pub mod verifier;

// Re-export commonly used items
pub use jwks::KeySetClient;
pub use jwks::KeySetError;
pub use jwks::KeySetFetcher;
pub use jwt::AccessClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicyError;
pub use verifier::TokenVerifier;
pub use verifier::VerificationError;
pub use verifier::VerificationStrategy;
