use axum::http::{header, HeaderMap, HeaderValue};
use chrono::Duration;

/// Cookie carrying the seller dashboard token
pub const SELLER_COOKIE: &str = "seller_token";
/// Cookie carrying a store customer's token
pub const STORE_COOKIE: &str = "store_token";

/// Read a cookie value from the request's `Cookie` header(s)
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for an auth token: httpOnly, `SameSite=Lax`, `Secure` when asked
pub fn auth_cookie(name: &str, token: &str, max_age: Duration, secure: bool) -> HeaderValue {
    build(name, token, max_age.num_seconds().max(0), secure)
}

/// `Set-Cookie` value that expires the named cookie immediately
pub fn clear_cookie(name: &str, secure: bool) -> HeaderValue {
    build(name, "", 0, secure)
}

fn build(name: &str, value: &str, max_age: i64, secure: bool) -> HeaderValue {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    // Tokens are base64url + dots, so the string is always a valid header value
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}
