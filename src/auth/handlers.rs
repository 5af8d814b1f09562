//! Authentication handlers

use axum::extract::{Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::error::AuthError;
use super::models::{
    AuthResponse, IdentityAttributes, LoginPayload, RefreshPayload, SignupPayload, UserType,
};
use super::password::{hash_password_off_thread, verify_password_off_thread};
use super::tokens::CredentialVerifier;
use super::validators::{LoginValidator, SignupValidator};
use crate::common::{bounded, generate_user_id, safe_email_log, ApiError, AppState, Validator};
use crate::users::models::NewUser;

const INVALID_LOGIN: &str = "email or password is not valid";

/// POST /users/signup
/// Registers a user and returns its first credential pair
///
/// # Request Body
/// ```json
/// {
///   "first_name": "Ada",
///   "last_name": "Lovelace",
///   "password": "<plaintext>",
///   "email": "ada@example.com",
///   "phone": "+44 20 0000 0000",
///   "user_type": "USER"
/// }
/// ```
///
/// # Response
/// ```json
/// { "user_id": "U_...", "access_token": "<jwt>", "refresh_token": "<jwt>" }
/// ```
pub async fn signup(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<SignupPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let validation_result = SignupValidator.validate(&payload);
    if !validation_result.is_valid {
        warn!(
            errors = ?validation_result.errors,
            "Signup validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let email = payload.email.trim().to_lowercase();
    let phone = payload.phone.trim().to_string();
    let user_type: UserType = payload
        .user_type
        .parse()
        .map_err(ApiError::ValidationError)?;
    let limit = state.store_timeouts.signup;

    let email_count = bounded(limit, "count_by_email", state.users.count_by_email(&email)).await?;
    let phone_count = bounded(limit, "count_by_phone", state.users.count_by_phone(&phone)).await?;
    if email_count > 0 || phone_count > 0 {
        info!(
            email = %safe_email_log(&email),
            "Signup rejected: email or phone already registered"
        );
        return Err(ApiError::BadRequest(
            "email or phone already exists".to_string(),
        ));
    }

    let password_hash = hash_password_off_thread(payload.password.clone()).await?;
    let user_id = generate_user_id();

    let mut new_user = NewUser {
        user_id: user_id.clone(),
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        email,
        phone,
        password_hash,
        user_type,
        refresh_token: String::new(),
    };

    let identity = IdentityAttributes {
        email: new_user.email.clone(),
        first_name: new_user.first_name.clone(),
        last_name: new_user.last_name.clone(),
        user_type,
        user_id: user_id.clone(),
    };
    let pair = state.tokens.issue_pair(&identity)?;
    new_user.refresh_token = pair.refresh_token.clone();

    match bounded(limit, "insert", state.users.insert(&new_user, Utc::now())).await {
        Ok(()) => {}
        Err(ApiError::DatabaseError(e)) if is_unique_violation(&e) => {
            info!(
                email = %safe_email_log(&new_user.email),
                "Signup lost a race on a unique column"
            );
            return Err(ApiError::BadRequest(
                "email or phone already exists".to_string(),
            ));
        }
        Err(e) => {
            error!(user_id = %user_id, "User not created");
            return Err(e);
        }
    }

    info!(
        user_id = %user_id,
        email = %safe_email_log(&new_user.email),
        user_type = %user_type,
        "Created new user account"
    );

    Ok(Json(AuthResponse {
        user_id,
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// POST /users/login
/// Authenticates by email and password, rotating the stored refresh credential
///
/// # Request Body
/// ```json
/// { "email": "ada@example.com", "password": "<plaintext>" }
/// ```
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let validation_result = LoginValidator.validate(&payload);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let email = payload.email.trim().to_lowercase();
    let limit = state.store_timeouts.default;

    let user = match bounded(limit, "find_by_email", state.users.find_by_email(&email)).await? {
        Some(u) => u,
        None => {
            warn!(email = %safe_email_log(&email), "Login failed: unknown email");
            return Err(ApiError::Unauthorized(INVALID_LOGIN.to_string()));
        }
    };

    if !verify_password_off_thread(user.password_hash.clone(), payload.password.clone()).await? {
        warn!(user_id = %user.user_id, "Login failed: password verification failed");
        return Err(ApiError::Unauthorized(INVALID_LOGIN.to_string()));
    }

    let identity = user.identity()?;
    let pair = state.tokens.issue_pair(&identity)?;

    let updated = bounded(
        limit,
        "update_refresh_token",
        state
            .users
            .update_refresh_token(&user.user_id, &pair.refresh_token, Utc::now()),
    )
    .await?;
    if updated == 0 {
        error!(user_id = %user.user_id, "User not updated: record vanished during login");
        return Err(ApiError::InternalServer("user not updated".to_string()));
    }

    info!(
        user_id = %user.user_id,
        email = %safe_email_log(&user.email),
        "User login successful"
    );

    Ok(Json(AuthResponse {
        user_id: user.user_id,
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// POST /users/refresh
/// Exchanges the current refresh credential for a new pair
///
/// Identity comes from the stored user record, not from the refresh credential.
/// The presented credential must be the one stored by the last login or refresh.
///
/// # Request Body
/// ```json
/// { "user_id": "U_...", "refresh_token": "<jwt>" }
/// ```
pub async fn refresh(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<RefreshPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let presented = payload.refresh_token.trim();
    if presented.is_empty() {
        return Err(AuthError::MissingCredential.into());
    }

    let claims = state.tokens.verify(presented).map_err(|e| {
        warn!(reason = ?e, user_id = %payload.user_id, "Refresh credential rejected");
        e
    })?;
    if claims.has_identity() {
        warn!(user_id = %payload.user_id, "Access credential presented for refresh");
        return Err(AuthError::MalformedCredential.into());
    }

    let limit = state.store_timeouts.default;
    let user = bounded(
        limit,
        "find_by_user_id",
        state.users.find_by_user_id(&payload.user_id),
    )
    .await?
    .ok_or(ApiError::Auth(AuthError::RefreshMismatch))?;

    if user.refresh_token.as_deref() != Some(presented) {
        warn!(user_id = %user.user_id, "Refresh credential superseded or foreign");
        return Err(AuthError::RefreshMismatch.into());
    }

    let identity = user.identity()?;
    let pair = state.tokens.issue_pair(&identity)?;

    let rotated = bounded(
        limit,
        "rotate_refresh_token",
        state
            .users
            .rotate_refresh_token(&user.user_id, presented, &pair.refresh_token, Utc::now()),
    )
    .await?;
    if rotated == 0 {
        warn!(user_id = %user.user_id, "Refresh credential rotated concurrently");
        return Err(AuthError::RefreshMismatch.into());
    }

    debug!(user_id = %user.user_id, "Refresh credential rotated");

    Ok(Json(AuthResponse {
        user_id: user.user_id,
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
