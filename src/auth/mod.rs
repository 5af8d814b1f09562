//! # Auth Module
//!
//! Credential lifecycle and authorization core:
//! - Claims model and HS256 credential issuance/verification
//! - Authorization matching between a caller and a requested resource
//! - The request gate (`require_credential` middleware and `AuthedUser` extractor)
//! - Signup, login and refresh flows

pub mod authorization;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod tokens;
pub mod validators;


pub use error::AuthError;
pub use extractors::{require_credential, AuthedUser};
pub use routes::auth_routes;
pub use tokens::TokenService;
