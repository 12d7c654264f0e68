// handlers/public/store/lookup.rs - store lookup by slug or custom domain

use axum::extract::{Path, State};

use super::active_store;
use crate::database::models::Store;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/store/:slug - Public store details
///
/// Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": "...", "slug": "acme", "name": "Acme",
///     "description": null, "customDomain": null, "isActive": true
///   }
/// }
/// ```
pub async fn store_get(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Store> {
    let store = active_store(state.gateway(), &slug).await?;
    Ok(ApiResponse::success(store))
}

/// GET /api/store/by-domain/:domain - Resolve a custom domain to its store
pub async fn store_by_domain_get(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> ApiResult<Store> {
    let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    let store = state
        .gateway()
        .find_store_by_domain(&domain)
        .await?
        .filter(|store| store.is_active)
        .ok_or_else(|| ApiError::not_found("Store not found"))?;

    Ok(ApiResponse::success(store))
}
