//! Credential and authorization failures

use thiserror::Error;

/// Failures of the credential lifecycle and the authorization check
///
/// Display strings are returned to clients, so they never include library
/// internals or key material. `SigningError` keeps its detail for the log only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("failed to issue credentials")]
    SigningError(String),

    #[error("missing credential")]
    MissingCredential,

    #[error("malformed credential")]
    MalformedCredential,

    #[error("credential signature is invalid")]
    SignatureInvalid,

    #[error("credential has expired")]
    CredentialExpired,

    #[error("refresh credential does not match the current session")]
    RefreshMismatch,

    #[error("not permitted to access this resource")]
    Forbidden,
}

/// Result of the authorization matcher
pub type AuthorizationError = AuthError;
