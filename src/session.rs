//! Session cookie codec. The only module allowed to touch the session
//! cookie; the value is an opaque bearer token and is never parsed here.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const COOKIE_NAME: &str = api::SESSION_COOKIE;
pub const MAX_AGE_SECONDS: i64 = 60 * 60 * 24;

pub fn get(jar: &CookieJar) -> Option<String> {
    jar.get(COOKIE_NAME).map(|cookie| cookie.value().to_string())
}

pub fn set(jar: CookieJar, token: &str) -> CookieJar {
    jar.add(
        Cookie::build((COOKIE_NAME, token.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .max_age(time::Duration::seconds(MAX_AGE_SECONDS)),
    )
}

pub fn clear(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(COOKIE_NAME).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_applies_cookie_attributes() {
        let jar = set(CookieJar::new(), "abc");
        let cookie = jar.get(COOKIE_NAME).unwrap();
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(
            cookie.max_age(),
            Some(time::Duration::seconds(MAX_AGE_SECONDS))
        );
    }

    #[test]
    fn get_roundtrip_and_clear() {
        let jar = set(CookieJar::new(), "abc");
        assert_eq!(get(&jar), Some("abc".to_string()));
        let jar = clear(jar);
        assert_eq!(get(&jar), None);
    }
}
