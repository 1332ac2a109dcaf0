//! JWKS-based JWT signature verification.
//!
//! Verify a compact EdDSA token against the key set an issuer currently publishes.
//! The pipeline is a single attempt: fetch the key set once, resolve the key named by the token's `kid`,
//! verify the Ed25519 signature, and only then decode the claims.
//!
//! See [`Verifier`] for the entry point, [`KeySetFetcher`] for plugging in an HTTP client,
//! and [`Error`] for the failure taxonomy.
//!
//! Expiration, audience, and issuer checks are not performed; apply them to the returned [`Claims`].

mod algorithm;
mod claims;
mod error;
mod fetch;
mod key;
mod token;
mod verify;

pub use algorithm::*;
pub use claims::*;
pub use error::*;
pub use fetch::*;
pub use key::*;
pub use token::*;
pub use verify::*;

// Re-export these crates.
pub use serde_json;
pub use url;
