// handlers/public/auth/utils.rs - shared input checks and cookie responses for auth handlers

use axum::http::{header, HeaderName, HeaderValue};
use uuid::Uuid;

use crate::auth::cookies::{auth_cookie, SELLER_COOKIE, STORE_COOKIE};
use crate::auth::Identity;
use crate::database::models::Store;
use crate::error::ApiError;
use crate::state::AppState;

/// Minimum password length for sellers and customers
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Basic email validation for registration and login.
///
/// Returns the trimmed, lowercased address.
pub fn validate_email_format(email: &str) -> Result<String, ApiError> {
    let email = email.trim().to_ascii_lowercase();
    let invalid = || ApiError::field_error("email", "Invalid email format");

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid());
    }

    // Domain needs a dot with something on both sides
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(email),
        _ => Err(invalid()),
    }
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::field_error(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    Ok(())
}

/// Issue a seller token and the `Set-Cookie` header that carries it
pub fn seller_session(state: &AppState, user_id: Uuid) -> Result<(String, [(HeaderName, HeaderValue); 1]), ApiError> {
    let token = state.tokens().issue(Identity::Seller { user_id })?;
    let cookie = auth_cookie(SELLER_COOKIE, &token, state.tokens().lifetime(), state.cookie_secure());
    Ok((token, [(header::SET_COOKIE, cookie)]))
}

/// Issue a customer token scoped to `store` and its `Set-Cookie` header
pub fn customer_session(
    state: &AppState,
    customer_id: Uuid,
    store: &Store,
) -> Result<(String, [(HeaderName, HeaderValue); 1]), ApiError> {
    let token = state.tokens().issue(Identity::Customer {
        customer_id,
        store_id: store.id,
        store_slug: store.slug.clone(),
    })?;
    let cookie = auth_cookie(STORE_COOKIE, &token, state.tokens().lifetime(), state.cookie_secure());
    Ok((token, [(header::SET_COOKIE, cookie)]))
}
