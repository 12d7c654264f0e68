// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use super::utils::{seller_session, validate_email_format, validate_password};
use crate::error::ApiError;
use crate::middleware::request::{optional, required};
use crate::middleware::{ApiResponse, Validate, ValidJson};
use crate::services::registration::{register_seller, RegisteredSeller, SellerSignup};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub store_name: Option<String>,
    pub store_description: Option<String>,
}

impl Validate for RegisterRequest {
    type Output = SellerSignup;

    fn validate(self) -> Result<SellerSignup, ApiError> {
        let email = validate_email_format(&required(self.email, "email")?)?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::field_error("password", "password is required"))?;
        validate_password(&password)?;

        Ok(SellerSignup {
            email,
            password,
            first_name: optional(self.first_name),
            last_name: optional(self.last_name),
            store_name: required(self.store_name, "storeName")?,
            store_description: optional(self.store_description),
        })
    }
}

#[derive(Serialize)]
struct RegisterResponse {
    #[serde(flatten)]
    seller: RegisteredSeller,
    token: String,
}

/// POST /api/auth/register - Create a seller account and its store
///
/// Creates the seller user and profile, derives a unique store slug from
/// the store name, creates the (active) store and starts a seller session.
///
/// Expected Input:
/// ```json
/// {
///   "email": "ada@example.com",
///   "password": "at-least-8-chars",
///   "firstName": "Ada",            // optional
///   "lastName": "Lovelace",        // optional
///   "storeName": "My Shop!",
///   "storeDescription": "..."      // optional
/// }
/// ```
///
/// Output (201, `seller_token` cookie set):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "user": { "id": "...", "email": "ada@example.com", "role": "SELLER" },
///     "profile": { "storeName": "My Shop!" },
///     "store": { "slug": "my-shop", "isActive": true },
///     "token": "eyJ..."
///   }
/// }
/// ```
///
/// Errors: 400 on invalid input or an email that is already registered.
pub async fn register_post(
    State(state): State<AppState>,
    ValidJson(signup): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let seller = register_seller(state.gateway(), signup).await?;
    let (token, cookie) = seller_session(&state, seller.user.id)?;

    Ok((cookie, ApiResponse::created(RegisterResponse { seller, token })))
}
