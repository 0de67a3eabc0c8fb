//! # teamcollab-auth
//!
//! Token handling for TeamCollab.
//!
//! ## Modules
//!
//! - `verifier`: the opaque [`TokenVerifier`] seam used by the gateway and REST extractor
//! - `jwt`: HS256 claims, decoding (the default verifier) and encoding (dev tokens)

pub mod jwt;
pub mod verifier;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use verifier::{TokenVerifier, VerifiedIdentity};
