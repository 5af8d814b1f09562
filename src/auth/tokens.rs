//! Credential issuance and verification (HS256 JWTs)

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, error};

use super::error::AuthError;
use super::models::{Claims, IdentityAttributes, TokenPair};
use crate::common::id_generator::generate_token_nonce;

pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_TTL_HOURS: i64 = 6;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Anything that turns a presented credential into verified claims
pub trait CredentialVerifier {
    fn verify(&self, presented: &str) -> Result<Claims, AuthError>;
}

/// Issues and verifies credentials with a single shared secret
///
/// Built once at startup from configuration and shared read-only.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenService {
    /// Create the service from the shared secret
    ///
    /// An empty secret is refused so nothing is ever signed with an empty key.
    pub fn from_secret(secret: &str) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::SigningError(
                "signing secret is not configured".to_string(),
            ));
        }

        // Expiry is checked by `verify_at` itself so expired and forged
        // credentials stay distinguishable.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl: Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
            refresh_ttl: Duration::hours(REFRESH_TOKEN_TTL_HOURS),
        })
    }

    pub fn issue_pair(&self, identity: &IdentityAttributes) -> Result<TokenPair, AuthError> {
        self.issue_pair_at(identity, Utc::now())
    }

    /// Mint an access/refresh pair as of `now`
    pub fn issue_pair_at(
        &self,
        identity: &IdentityAttributes,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let access_claims = Claims::access(identity, (now + self.access_ttl).timestamp());
        let refresh_claims = Claims::refresh(
            (now + self.refresh_ttl).timestamp(),
            generate_token_nonce(),
        );

        let access_token = self.sign(&access_claims)?;
        let refresh_token = self.sign(&refresh_claims)?;

        debug!(
            user_id = %identity.user_id,
            user_type = %identity.user_type,
            access_exp = access_claims.exp,
            refresh_exp = refresh_claims.exp,
            "Issued credential pair"
        );

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify `presented` as of `now` and return its claims
    pub fn verify_at(&self, presented: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let decoded = decode::<Claims>(presented, &self.decoding, &self.validation)
            .map_err(classify_decode_error)?;

        let claims = decoded.claims;
        if claims.exp <= now.timestamp() {
            debug!(
                exp = claims.exp,
                now = now.timestamp(),
                "Credential signature valid but expired"
            );
            return Err(AuthError::CredentialExpired);
        }

        Ok(claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding).map_err(|e| {
            error!(error = %e, "Failed to sign credential");
            AuthError::SigningError(e.to_string())
        })
    }
}

impl CredentialVerifier for TokenService {
    fn verify(&self, presented: &str) -> Result<Claims, AuthError> {
        self.verify_at(presented, Utc::now())
    }
}

fn classify_decode_error(e: jsonwebtoken::errors::Error) -> AuthError {
    let classified = match e.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::SignatureInvalid,
        ErrorKind::ExpiredSignature => AuthError::CredentialExpired,
        _ => AuthError::MalformedCredential,
    };
    debug!(error = %e, classified = ?classified, "Credential rejected during decode");
    classified
}
