// handlers/public/auth/session.rs - seller login and logout

use axum::{extract::State, http::header, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::utils::{seller_session, validate_email_format};
use crate::auth::cookies::{clear_cookie, SELLER_COOKIE};
use crate::auth::password::verify_password;
use crate::database::models::{Role, SellerUser};
use crate::error::ApiError;
use crate::middleware::request::required;
use crate::middleware::{ApiResponse, Validate, ValidJson};
use crate::state::AppState;

/// Same message for unknown email and wrong password
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    type Output = Credentials;

    fn validate(self) -> Result<Credentials, ApiError> {
        Ok(Credentials {
            email: validate_email_format(&required(self.email, "email")?)?,
            password: self
                .password
                .filter(|p| !p.is_empty())
                .ok_or_else(|| ApiError::field_error("password", "password is required"))?,
        })
    }
}

#[derive(Serialize)]
struct LoginResponse {
    user: SellerUser,
    token: String,
}

/// POST /api/auth/login - Authenticate a seller
///
/// Expected Input:
/// ```json
/// { "email": "ada@example.com", "password": "..." }
/// ```
///
/// Output: `{ "user": {...}, "token": "eyJ..." }` and the `seller_token` cookie.
/// Unknown email, wrong password and non-seller accounts all answer
/// 401 `Invalid credentials`.
pub async fn login_post(
    State(state): State<AppState>,
    ValidJson(credentials): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .gateway()
        .find_user_by_email(&credentials.email)
        .await?
        .filter(|user| user.role == Role::Seller);

    let Some(user) = user else {
        tracing::warn!("Seller login failed: unknown account");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(&credentials.password, &user.password_hash)? {
        tracing::warn!("Seller login failed for user {}", user.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let (token, cookie) = seller_session(&state, user.id)?;
    tracing::info!("Seller {} logged in", user.id);

    Ok((cookie, ApiResponse::success(LoginResponse { user, token })))
}

/// POST /api/auth/logout - End the seller session
///
/// Always succeeds and expires the `seller_token` cookie; no token is required.
pub async fn logout_post(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_cookie(SELLER_COOKIE, state.cookie_secure());
    (
        [(header::SET_COOKIE, cookie)],
        ApiResponse::success(json!({ "message": "Logged out successfully" })),
    )
}
