//! # Users Module
//!
//! User records, their SQLite store, and the protected user resources.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;


pub use routes::users_routes;
pub use store::UserStore;
