//! One-shot flash messages.
//!
//! A flash is a short notification carried across exactly one
//! redirect-then-render cycle ("Snippet successfully created!"). It lives
//! in a signed cookie scoped to the requesting client: [`set`] adds it,
//! [`pop`] reads and clears it. A missing or tamper-invalid cookie reads
//! as no flash; it never fails a request.

use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::Cookie;

/// Name of the flash cookie.
const FLASH_COOKIE: &str = "flash";

/// Store a flash message to be shown on the next HTML page render.
pub fn set(jar: SignedCookieJar, message: &str) -> SignedCookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, message.to_string()))
        .path("/")
        .http_only(true)
        .build();
    jar.add(cookie)
}

/// Read and clear the pending flash message, if any.
///
/// The returned jar carries the removal and must be included in the
/// response for the read-once contract to hold.
pub fn pop(jar: SignedCookieJar) -> (SignedCookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let message = cookie.value().to_string();
            let removal = Cookie::build((FLASH_COOKIE, "")).path("/").build();
            (jar.remove(removal), Some(message))
        }
        None => (jar, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    fn jar() -> SignedCookieJar {
        SignedCookieJar::new(Key::derive_from(&[7u8; 64]))
    }

    #[test]
    fn pop_on_empty_jar_is_none() {
        let (_, flash) = pop(jar());
        assert_eq!(flash, None);
    }

    #[test]
    fn set_then_pop_returns_message_once() {
        let jar = set(jar(), "Snippet successfully created!");
        let (jar, flash) = pop(jar);
        assert_eq!(flash.as_deref(), Some("Snippet successfully created!"));

        // The pop removed the cookie; a second read sees nothing.
        let (_, flash) = pop(jar);
        assert_eq!(flash, None);
    }
}
