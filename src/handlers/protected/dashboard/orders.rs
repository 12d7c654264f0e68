// handlers/protected/dashboard/orders.rs - PATCH /api/dashboard/orders/:id

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Order, OrderStatus};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::request::required;
use crate::middleware::{ApiResponse, ApiResult, Validate, ValidJson};
use crate::state::AppState;

const ORDER_NOT_FOUND: &str = "Order not found";

#[derive(Debug, Deserialize)]
pub struct OrderUpdateRequest {
    pub status: Option<String>,
}

impl Validate for OrderUpdateRequest {
    type Output = OrderStatus;

    fn validate(self) -> Result<OrderStatus, ApiError> {
        required(self.status, "status")?
            .parse()
            .map_err(|msg: String| ApiError::field_error("status", msg))
    }
}

/// PATCH /api/dashboard/orders/:id - Change an order's status
///
/// Expected Input:
/// ```json
/// { "status": "SHIPPED" }
/// ```
///
/// Orders of other stores answer exactly like orders that do not exist
/// (404 `Order not found`), so order ids never leak across tenants.
/// The seller is resolved before the body is looked at.
pub async fn order_patch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
    body: Result<ValidJson<OrderUpdateRequest>, ApiError>,
) -> ApiResult<Order> {
    let seller = state.resolver().resolve_seller(&headers).await?;
    let ValidJson(status) = body?;

    let order_id = Uuid::parse_str(&order_id).map_err(|_| ApiError::not_found(ORDER_NOT_FOUND))?;
    state
        .gateway()
        .find_order(order_id)
        .await?
        .filter(|order| order.store_id == seller.store.id)
        .ok_or_else(|| ApiError::not_found(ORDER_NOT_FOUND))?;

    let order = state
        .gateway()
        .update_order_status(order_id, status)
        .await
        .map_err(|err| match err {
            DatabaseError::NotFound(_) => ApiError::not_found(ORDER_NOT_FOUND),
            other => ApiError::from(other),
        })?;

    tracing::info!("Order {} set to {:?} by seller {}", order.id, order.status, seller.user.id);
    Ok(ApiResponse::success(order))
}
