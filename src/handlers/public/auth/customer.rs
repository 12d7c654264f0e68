// handlers/public/auth/customer.rs - store customer registration and login
//
// Both endpoints are scoped to one store, named by `storeSlug` in the body
// or, failing that, by the custom domain the tenant router annotated.

use axum::{extract::State, http::HeaderMap, response::IntoResponse};
use serde::{Deserialize, Serialize};

use super::utils::{customer_session, validate_email_format, validate_password};
use crate::auth::password::verify_password;
use crate::database::models::{Store, StoreCustomer};
use crate::database::Gateway;
use crate::error::ApiError;
use crate::middleware::request::{optional, required};
use crate::middleware::tenant::{injected, X_CUSTOM_DOMAIN};
use crate::middleware::{ApiResponse, Validate, ValidJson};
use crate::services::registration::{register_customer, CustomerSignup};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRegisterRequest {
    pub store_slug: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub struct StoreRegistration {
    store_slug: Option<String>,
    signup: CustomerSignup,
}

impl Validate for StoreRegisterRequest {
    type Output = StoreRegistration;

    fn validate(self) -> Result<StoreRegistration, ApiError> {
        let email = validate_email_format(&required(self.email, "email")?)?;
        let password = self
            .password
            .ok_or_else(|| ApiError::field_error("password", "password is required"))?;
        validate_password(&password)?;

        Ok(StoreRegistration {
            store_slug: optional(self.store_slug),
            signup: CustomerSignup {
                email,
                password,
                first_name: required(self.first_name, "firstName")?,
                last_name: required(self.last_name, "lastName")?,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreLoginRequest {
    pub store_slug: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct StoreCredentials {
    store_slug: Option<String>,
    email: String,
    password: String,
}

impl Validate for StoreLoginRequest {
    type Output = StoreCredentials;

    fn validate(self) -> Result<StoreCredentials, ApiError> {
        Ok(StoreCredentials {
            store_slug: optional(self.store_slug),
            email: validate_email_format(&required(self.email, "email")?)?,
            password: self
                .password
                .filter(|p| !p.is_empty())
                .ok_or_else(|| ApiError::field_error("password", "password is required"))?,
        })
    }
}

#[derive(Serialize)]
struct CustomerSession {
    customer: StoreCustomer,
    store: Store,
    token: String,
}

/// Active store named by slug, or by the request's custom domain
pub async fn target_store(
    gateway: &dyn Gateway,
    slug: Option<&str>,
    headers: &HeaderMap,
) -> Result<Store, ApiError> {
    let store = match (slug, injected(headers, &X_CUSTOM_DOMAIN)) {
        (Some(slug), _) => gateway.find_store_by_slug(slug).await?,
        (None, Some(domain)) => gateway.find_store_by_domain(&domain).await?,
        (None, None) => return Err(ApiError::field_error("storeSlug", "storeSlug is required")),
    };

    store
        .filter(|store| store.is_active)
        .ok_or_else(|| ApiError::not_found("Store not found"))
}

/// POST /api/auth/store-register - Create a customer account in one store
///
/// Expected Input:
/// ```json
/// {
///   "storeSlug": "acme",
///   "email": "sam@example.com",
///   "password": "at-least-8-chars",
///   "firstName": "Sam",
///   "lastName": "Shopper"
/// }
/// ```
///
/// Output (201, `store_token` cookie set): `{ "customer": {...}, "store": {...}, "token": "eyJ..." }`
pub async fn store_register_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidJson(input): ValidJson<StoreRegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let store = target_store(state.gateway(), input.store_slug.as_deref(), &headers).await?;
    let customer = register_customer(state.gateway(), &store, input.signup).await?;
    let (token, cookie) = customer_session(&state, customer.id, &store)?;

    Ok((cookie, ApiResponse::created(CustomerSession { customer, store, token })))
}

/// POST /api/auth/store-login - Authenticate a customer of one store
///
/// Expected Input:
/// ```json
/// { "storeSlug": "acme", "email": "sam@example.com", "password": "..." }
/// ```
///
/// A customer of another store with the same email cannot log in here;
/// failures answer 401 `Invalid credentials`.
pub async fn store_login_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidJson(credentials): ValidJson<StoreLoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let store = target_store(state.gateway(), credentials.store_slug.as_deref(), &headers).await?;

    let customer = state
        .gateway()
        .find_customer_by_email(store.id, &credentials.email)
        .await?;

    let customer = match customer {
        Some(customer) if verify_password(&credentials.password, &customer.password_hash)? => customer,
        _ => {
            tracing::warn!("Customer login failed for store '{}'", store.slug);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    let (token, cookie) = customer_session(&state, customer.id, &store)?;
    Ok((cookie, ApiResponse::success(CustomerSession { customer, store, token })))
}
