//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the public authentication router
///
/// # Routes
/// - `POST /users/signup` - Register and receive a credential pair
/// - `POST /users/login` - Password login, rotates the stored refresh credential
/// - `POST /users/refresh` - Exchange the current refresh credential for a new pair
pub fn auth_routes() -> Router {
    Router::new()
        .route("/users/signup", post(handlers::signup))
        .route("/users/login", post(handlers::login))
        .route("/users/refresh", post(handlers::refresh))
}
