// handlers/public/store/catalog.rs - product and category listings

use axum::extract::{Path, State};
use serde::Deserialize;

use super::active_store;
use crate::database::models::{Category, Product, ProductQuery, ProductSort};
use crate::error::ApiError;
use crate::middleware::request::optional;
use crate::middleware::{ApiResponse, ApiResult, ValidQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProductParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
}

impl TryFrom<ProductParams> for ProductQuery {
    type Error = ApiError;

    fn try_from(params: ProductParams) -> Result<Self, ApiError> {
        let sort = match optional(params.sort) {
            Some(sort) => sort
                .parse::<ProductSort>()
                .map_err(|msg| ApiError::field_error("sort", msg))?,
            None => ProductSort::default(),
        };

        Ok(ProductQuery {
            category_slug: optional(params.category),
            search: optional(params.search),
            featured_only: params.featured.unwrap_or(false),
            sort,
            limit: ProductQuery::clamp_limit(params.limit),
        })
    }
}

/// GET /api/store/:slug/products - Active products of one store
///
/// Query parameters (all optional):
/// - `category`: category slug
/// - `search`: case-insensitive match on name or description
/// - `featured`: `true` for featured products only
/// - `sort`: `newest` (default), `price_asc`, `price_desc`, `name`
/// - `limit`: default 50, at most 100
pub async fn products_get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ValidQuery(params): ValidQuery<ProductParams>,
) -> ApiResult<Vec<Product>> {
    let store = active_store(state.gateway(), &slug).await?;
    let query = ProductQuery::try_from(params)?;
    let products = state.gateway().list_products(store.id, &query).await?;
    Ok(ApiResponse::success(products))
}

/// GET /api/store/:slug/categories - Categories of one store, by name
pub async fn categories_get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Vec<Category>> {
    let store = active_store(state.gateway(), &slug).await?;
    let categories = state.gateway().list_categories(store.id).await?;
    Ok(ApiResponse::success(categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_are_absent() {
        let query = ProductQuery::try_from(ProductParams::default()).unwrap();
        assert_eq!(query.sort, ProductSort::Newest);
        assert_eq!(query.limit, ProductQuery::DEFAULT_LIMIT);
        assert!(!query.featured_only);
        assert!(query.search.is_none());
    }

    #[test]
    fn limit_is_capped_and_sort_parsed() {
        let query = ProductQuery::try_from(ProductParams {
            sort: Some("price_desc".to_string()),
            limit: Some(500),
            search: Some("  ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(query.sort, ProductSort::PriceDesc);
        assert_eq!(query.limit, ProductQuery::MAX_LIMIT);
        assert!(query.search.is_none());
    }

    #[test]
    fn unknown_sort_is_a_validation_error() {
        let err = ProductQuery::try_from(ProductParams {
            sort: Some("cheapest".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
