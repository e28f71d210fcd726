use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::time::Duration;

/// Cookie carrying the one-shot flash message. It survives exactly one
/// redirect: the next page render takes it and clears it.
const FLASH_COOKIE: &str = "error_message";

/// Stashes a human-readable reason for the next rendered page.
pub fn set_flash(cookies: &Cookies, message: &str) {
    let mut cookie = Cookie::new(FLASH_COOKIE, message.to_string());
    cookie.set_http_only(true);
    cookie.set_path("/");
    // Short lifetime; a consumed flash clears it sooner.
    cookie.set_max_age(Duration::minutes(5));
    cookies.add(cookie);
}

/// Consumes the flash message, clearing it so it is rendered at most once.
pub fn take_flash(cookies: &Cookies) -> Option<String> {
    let message = cookies.get(FLASH_COOKIE).map(|c| c.value().to_string())?;

    let mut expired = Cookie::new(FLASH_COOKIE, "");
    expired.set_path("/");
    expired.set_max_age(Duration::seconds(0));
    cookies.remove(expired);

    Some(message)
}
