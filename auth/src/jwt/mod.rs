pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::AccessClaims;
pub use codec::TokenCodec;
pub use codec::TOKEN_TTL_HOURS;
pub use errors::TokenError;
