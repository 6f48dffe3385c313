// Authentication: OIDC login flow, server-side sessions, middleware

pub mod middleware;
pub mod oidc;
pub mod session;

pub use middleware::{require_session, CurrentUser, SESSION_COOKIE};
pub use oidc::OidcClient;
pub use session::SessionService;
