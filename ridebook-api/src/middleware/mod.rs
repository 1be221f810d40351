pub mod auth;

pub use auth::{caller_auth_middleware, CallerClaims};
