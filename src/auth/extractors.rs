//! Request gate: credential extraction, verification, and the `AuthedUser` extractor

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::authorization::{authorize, require_admin};
use super::error::{AuthError, AuthorizationError};
use super::models::{Claims, UserType};
use super::tokens::CredentialVerifier;
use crate::common::{safe_email_log, safe_token_log, ApiError, AppState};

/// Authenticated caller, produced only by the gate
///
/// Handlers take this as an argument and pass it to the authorization matcher.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub claims: Claims,
}

impl AuthedUser {
    pub fn user_id(&self) -> &str {
        &self.claims.user_id
    }

    pub fn user_type(&self) -> Option<UserType> {
        self.claims.user_type
    }

    /// Check this caller against the resource owned by `resource_id`
    pub fn authorize(&self, resource_id: &str) -> Result<(), AuthorizationError> {
        authorize(&self.claims, resource_id).map_err(|e| {
            warn!(
                user_id = %self.claims.user_id,
                requested = %resource_id,
                "Authorization denied"
            );
            e
        })
    }

    pub fn require_admin(&self) -> Result<(), AuthorizationError> {
        require_admin(&self.claims).map_err(|e| {
            warn!(user_id = %self.claims.user_id, "Elevated access denied");
            e
        })
    }
}

/// Read the credential from `header`, stripping an optional `Bearer ` prefix
///
/// Absent, blank, and non-text values all count as absent.
pub fn presented_credential<'a>(headers: &'a HeaderMap, header: &HeaderName) -> Option<&'a str> {
    let raw = headers.get(header)?.to_str().ok()?.trim();
    let bare = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if bare.is_empty() {
        None
    } else {
        Some(bare)
    }
}

/// Run the gate over a request's headers
pub fn authenticate<V>(
    headers: &HeaderMap,
    header: &HeaderName,
    verifier: &V,
) -> Result<AuthedUser, AuthError>
where
    V: CredentialVerifier + ?Sized,
{
    let token = match presented_credential(headers, header) {
        Some(t) => t,
        None => {
            warn!(header = %header, "Authentication failed: missing credential header");
            return Err(AuthError::MissingCredential);
        }
    };

    let claims = verifier.verify(token).map_err(|e| {
        warn!(
            reason = ?e,
            token = %safe_token_log(token),
            "Credential verification failed"
        );
        e
    })?;

    // A refresh credential verifies but carries no identity.
    if !claims.has_identity() {
        warn!(
            token = %safe_token_log(token),
            "Authentication failed: credential carries no identity"
        );
        return Err(AuthError::MalformedCredential);
    }

    debug!(
        user_id = %claims.user_id,
        email = %safe_email_log(&claims.email),
        user_type = ?claims.user_type,
        "Credential verified"
    );

    Ok(AuthedUser { claims })
}

/// Middleware guarding every protected route
///
/// Rejects the request before the handler runs and otherwise attaches the
/// `AuthedUser` to the request extensions.
pub async fn require_credential(
    Extension(state): Extension<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authed = authenticate(
        request.headers(),
        &state.credential_header,
        state.tokens.as_ref(),
    )?;
    request.extensions_mut().insert(authed);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(authed) = parts.extensions.get::<AuthedUser>() {
            return Ok(authed.clone());
        }

        // Mounted without `require_credential`: run the gate here instead.
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        Ok(authenticate(
            &parts.headers,
            &app_state.credential_header,
            app_state.tokens.as_ref(),
        )?)
    }
}
