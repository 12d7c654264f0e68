// handlers/protected/auth/session.rs - current seller and store customer sessions

use axum::{extract::State, http::HeaderMap};
use serde::Deserialize;

use crate::auth::{CustomerPrincipal, SellerPrincipal};
use crate::error::ApiError;
use crate::middleware::request::optional;
use crate::middleware::tenant::{injected, X_CUSTOM_DOMAIN};
use crate::middleware::{ApiResponse, ApiResult, ValidQuery};
use crate::state::AppState;

/// GET /api/auth/me - The authenticated seller, profile and store
///
/// Token from `Authorization: Bearer` or the `seller_token` cookie.
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "user": { "id": "...", "email": "ada@example.com", "role": "SELLER" },
///     "profile": { "storeName": "Acme" },
///     "store": { "slug": "acme", "isActive": true }
///   }
/// }
/// ```
pub async fn me_get(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<SellerPrincipal> {
    let seller = state.resolver().resolve_seller(&headers).await?;
    Ok(ApiResponse::success(seller))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyParams {
    pub store_slug: Option<String>,
}

/// GET /api/auth/verify-store-token - Check a store customer's token
///
/// With `?storeSlug=` (or on a custom domain) the token must be scoped to
/// that store, otherwise 401 `Invalid store context`.
///
/// Output: `{ "customer": {...}, "store": {...} }`
pub async fn verify_store_token_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidQuery(params): ValidQuery<VerifyParams>,
) -> ApiResult<CustomerPrincipal> {
    let gateway = state.gateway();
    let expected = match (optional(params.store_slug), injected(&headers, &X_CUSTOM_DOMAIN)) {
        (Some(slug), _) => Some(
            gateway
                .find_store_by_slug(&slug)
                .await?
                .ok_or_else(|| ApiError::not_found("Store not found"))?,
        ),
        (None, Some(domain)) => gateway.find_store_by_domain(&domain).await?,
        (None, None) => None,
    };

    let customer = state
        .resolver()
        .resolve_customer(&headers, expected.as_ref())
        .await?;
    Ok(ApiResponse::success(customer))
}
