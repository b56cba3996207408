/**
 * Session Cookies
 *
 * Login and refresh hand the token pair out twice: in the JSON body, and as
 * httpOnly cookies so browser clients never have to touch the tokens.
 */

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::backend::middleware::{ACCESS_COOKIE, REFRESH_COOKIE};
use crate::shared::TokenPair;

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Set both token cookies
pub fn with_session_cookies(jar: CookieJar, pair: &TokenPair, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, pair.access_token.clone(), secure))
        .add(session_cookie(REFRESH_COOKIE, pair.refresh_token.clone(), secure))
}

/// Expire both token cookies
pub fn without_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_COOKIE).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookies_added_and_removed() {
        let pair = TokenPair {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
        };
        let jar = with_session_cookies(CookieJar::new(), &pair, true);

        let access = jar.get(ACCESS_COOKIE).unwrap();
        assert_eq!(access.value(), "access");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(jar.get(REFRESH_COOKIE).unwrap().value(), "refresh");

        let jar = without_session_cookies(jar);
        assert!(jar.get(ACCESS_COOKIE).is_none());
        assert!(jar.get(REFRESH_COOKIE).is_none());
    }
}
