//! Judge authentication: token verification and the request extractor.

pub mod extractor;
pub mod token;

pub use extractor::AuthenticatedJudge;
pub use token::{AuthError, JwtVerifier, TokenVerifier};
