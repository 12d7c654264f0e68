// handlers/protected/dashboard/stats.rs - GET /api/dashboard/stats

use axum::{extract::State, http::HeaderMap};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::request::required;
use crate::middleware::{ApiResponse, ApiResult, ValidQuery};
use crate::services::stats::DashboardStats;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    pub store_id: Option<String>,
}

/// GET /api/dashboard/stats?storeId= - Dashboard figures for a store
///
/// Requires a valid seller token; `storeId` is mandatory (400 otherwise).
/// All figures are currently zero.
pub async fn stats_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<ValidQuery<StatsParams>, ApiError>,
) -> ApiResult<DashboardStats> {
    state.resolver().resolve_seller(&headers).await?;
    let ValidQuery(params) = params?;

    let store_id = required(params.store_id, "storeId")?;
    let store_id = Uuid::parse_str(&store_id)
        .map_err(|_| ApiError::field_error("storeId", "storeId must be a UUID"))?;

    Ok(ApiResponse::success(DashboardStats::for_store(store_id)))
}
