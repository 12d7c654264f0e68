// handlers/protected/store/account.rs - the signed-in customer's account and orders

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};

use crate::auth::CustomerPrincipal;
use crate::database::models::Order;
use crate::handlers::public::store::active_store;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

async fn customer_of(state: &AppState, headers: &HeaderMap, slug: &str) -> Result<CustomerPrincipal, crate::error::ApiError> {
    let store = active_store(state.gateway(), slug).await?;
    Ok(state.resolver().resolve_customer(headers, Some(&store)).await?)
}

/// GET /api/store/:slug/account - The customer's profile in this store
///
/// Output: `{ "customer": { "id": "...", "email": "...", "firstName": "Sam" }, "store": {...} }`
pub async fn account_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<CustomerPrincipal> {
    let principal = customer_of(&state, &headers, &slug).await?;
    Ok(ApiResponse::success(principal))
}

/// GET /api/store/:slug/orders - The customer's orders in this store, newest first
pub async fn orders_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<Vec<Order>> {
    let principal = customer_of(&state, &headers, &slug).await?;
    let orders = state
        .gateway()
        .list_customer_orders(principal.store.id, principal.customer.id)
        .await?;
    Ok(ApiResponse::success(orders))
}
