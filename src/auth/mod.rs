//! Authentication module
//!
//! Supports: Basic (account SID / API key), Bearer, Custom Headers
//!
//! Credentials are resolved once from the client configuration and applied
//! to every request by the `Authenticator`.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::Credentials;
