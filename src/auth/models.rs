//! Authentication data models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classifier carried in every access credential
///
/// Only these two values exist. A credential naming anything else does not decode.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserType {
    Admin,
    User,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "ADMIN",
            UserType::User => "USER",
        }
    }

    /// Elevated types skip the ownership check in `authorize`
    pub fn is_elevated(&self) -> bool {
        matches!(self, UserType::Admin)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserType::Admin),
            "USER" => Ok(UserType::User),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

/// Identity attributes read from the persisted user record at issuance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAttributes {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub user_id: String,
}

/// JWT claims structure
///
/// Access credentials carry every identity field. Refresh credentials carry only
/// `exp` and a random `jti`; their identity fields are omitted on the wire and
/// decode as empty. The `jti` keeps two refresh credentials minted in the same
/// second distinct, so rotation can tell them apart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jti: String,
}

impl Claims {
    pub fn access(identity: &IdentityAttributes, exp: i64) -> Self {
        Self {
            email: identity.email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            user_type: Some(identity.user_type),
            user_id: identity.user_id.clone(),
            exp,
            jti: String::new(),
        }
    }

    pub fn refresh(exp: i64, jti: String) -> Self {
        Self {
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            user_type: None,
            user_id: String::new(),
            exp,
            jti,
        }
    }

    /// True when the claims identify a caller (as access credentials do)
    pub fn has_identity(&self) -> bool {
        self.user_type.is_some() && !self.user_id.is_empty()
    }
}

/// Signed access/refresh pair returned by the issuer
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// POST /users/signup body
#[derive(Deserialize, Debug)]
pub struct SignupPayload {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub user_type: String,
}

/// POST /users/login body
#[derive(Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// POST /users/refresh body
#[derive(Deserialize)]
pub struct RefreshPayload {
    pub user_id: String,
    pub refresh_token: String,
}

/// Response for signup, login and refresh
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
}
