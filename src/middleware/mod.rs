pub mod auth;
pub mod ownership;
pub mod security_headers;

pub use auth::AccessGuard;
pub use ownership::{EmailQuery, OwnedEmail};
pub use security_headers::SecurityHeaders;
