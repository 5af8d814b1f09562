//! User record models

use serde::Serialize;
use sqlx::FromRow;
use std::str::FromStr;

use crate::auth::models::{IdentityAttributes, UserType};
use crate::common::ApiError;

/// User database model
#[derive(FromRow, Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub user_type: String,
    pub refresh_token: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRecord {
    /// Identity attributes for credential issuance
    pub fn identity(&self) -> Result<IdentityAttributes, ApiError> {
        let user_type = UserType::from_str(&self.user_type).map_err(|e| {
            ApiError::InternalServer(format!("corrupt user record {}: {}", self.user_id, e))
        })?;

        Ok(IdentityAttributes {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            user_type,
            user_id: self.user_id.clone(),
        })
    }
}

/// Row to insert at signup
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub user_type: UserType,
    pub refresh_token: String,
}

/// Public view of a user; never includes the password hash or refresh credential
#[derive(Serialize, Debug)]
pub struct UserProfile {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub user_type: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserProfile {
    fn from(user: UserRecord) -> Self {
        Self {
            user_id: user.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            user_type: user.user_type,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
