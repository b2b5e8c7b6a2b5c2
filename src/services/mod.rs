pub mod auth_service;

pub use auth_service::{CookiePolicy, Identity, TokenService, TOKEN_COOKIE};
