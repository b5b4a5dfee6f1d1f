use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;

use super::jwt;

pub const PORTAL_ACCESS: &str = "portal_access";

fn cookie_secure() -> bool {
    std::env::var("COOKIE_SECURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

fn cookie_domain() -> Option<String> {
    std::env::var("COOKIE_DOMAIN")
        .ok()
        .filter(|d| !d.is_empty())
}

fn to_header(cookie: Cookie<'_>) -> Option<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Build a Set-Cookie header value for the access token.
pub fn build_access_cookie(token: &str, max_age_minutes: i64) -> Option<HeaderValue> {
    let mut cookie = Cookie::build((PORTAL_ACCESS, token))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::seconds(max_age_minutes * 60))
        .secure(cookie_secure());

    if let Some(domain) = cookie_domain() {
        cookie = cookie.domain(domain);
    }

    to_header(cookie.build())
}

/// Build a Set-Cookie header that expires the access cookie.
pub fn build_clear_cookie() -> Option<HeaderValue> {
    let mut cookie = Cookie::build((PORTAL_ACCESS, ""))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::ZERO);

    if let Some(domain) = cookie_domain() {
        cookie = cookie.domain(domain);
    }

    to_header(cookie.build())
}

/// Extract the access token from the cookie (preferred) or Bearer header (fallback).
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, PORTAL_ACCESS).filter(|t| !t.is_empty()) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Parse a specific cookie value from the Cookie header.
fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header_value in headers.get_all(header::COOKIE) {
        if let Ok(cookie_str) = header_value.to_str() {
            for piece in cookie_str.split(';') {
                if let Ok(c) = Cookie::parse(piece.trim().to_string()) {
                    if c.name() == name {
                        return Some(c.value().to_string());
                    }
                }
            }
        }
    }
    None
}

/// Set the access cookie on a response using the configured token lifetime.
pub fn set_auth_cookie(headers: &mut HeaderMap, access_token: &str) {
    if let Some(value) = build_access_cookie(access_token, jwt::access_token_expiry_minutes()) {
        headers.append(header::SET_COOKIE, value);
    }
}

/// Clear the access cookie on a response.
pub fn clear_auth_cookie(headers: &mut HeaderMap) {
    if let Some(value) = build_clear_cookie() {
        headers.append(header::SET_COOKIE, value);
    }
}
