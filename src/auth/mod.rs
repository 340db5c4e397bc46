//! Authentication module
//!
//! Supports: Bearer, `token`, Basic, API key header
//!
//! Token auth also sets the User-Agent from the identity label, since the
//! provider rejects requests without one.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{
    AuthConfig, AuthScheme, Credentials, DEFAULT_IDENTITY_VAR, DEFAULT_TOKEN_VAR,
    DEFAULT_USER_AGENT,
};
