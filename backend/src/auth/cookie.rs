//! Session cookie construction.
//!
//! The session token travels in an HTTP-only cookie named `token`, scoped to
//! the whole site and living exactly as long as the token itself.

use axum_extra::extract::cookie::Cookie;

use crate::utils::jwt::SESSION_TTL_SECONDS;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "token";

/// Builds session and removal cookies with a consistent set of attributes.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookies {
    secure: bool,
}

impl SessionCookies {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Cookie holding a freshly issued session token.
    pub fn session(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .max_age(time::Duration::seconds(SESSION_TTL_SECONDS))
            .build()
    }

    /// Cookie instructing the client to discard its session token now.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .build();
        cookie.make_removal();
        cookie
    }
}
