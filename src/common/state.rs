// Application state shared across all modules

use axum::http::HeaderName;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::common::config::StoreTimeouts;
use crate::users::UserStore;

/// Application state containing the user store, the credential service, and configuration
///
/// Everything here is read-only after startup, so handlers share it through an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub tokens: Arc<TokenService>,
    pub credential_header: HeaderName,
    pub store_timeouts: StoreTimeouts,
}
