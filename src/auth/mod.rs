//! Caller identity
//!
//! Requests carry `Authorization: Bearer <jwt>` (HS256, shared secret).
//! [`identity_middleware`] verifies the token and binds an
//! [`AuthenticatedUser`] to the request; handlers decide whether identity is
//! required.

pub mod middleware;
pub mod models;
pub mod token;

pub use middleware::identity_middleware;
pub use models::{AuthenticatedUser, Claims};
pub use token::IdentityVerifier;
