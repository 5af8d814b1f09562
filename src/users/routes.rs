//! User resource routes (all protected)

use axum::{middleware, routing::get, Router};

use super::handlers;
use crate::auth::require_credential;

/// Creates the protected user router
///
/// Every route sits behind `require_credential`.
///
/// # Routes
/// - `GET /users` - List users (ADMIN)
/// - `GET /users/:user_id` - Get one user (owner or ADMIN)
/// - `GET /api-1`, `GET /api-2` - Authenticated probes
pub fn users_routes() -> Router {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users/:user_id", get(handlers::get_user))
        .route("/api-1", get(handlers::protected_probe))
        .route("/api-2", get(handlers::protected_probe))
        .route_layer(middleware::from_fn(require_credential))
}
