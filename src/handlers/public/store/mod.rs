// handlers/public/store/mod.rs - Public storefront endpoints
//
// Store lookup and catalog listing. The tenant router classifies all of these
// as public, so no credentials are read here.

pub mod catalog; // GET /api/store/:slug/products, /api/store/:slug/categories
pub mod lookup;  // GET /api/store/:slug, /api/store/by-domain/:domain

pub use catalog::{categories_get, products_get};
pub use lookup::{store_by_domain_get, store_get};

use crate::database::models::Store;
use crate::database::Gateway;
use crate::error::ApiError;

/// Active store by slug. Missing and inactive stores are both 404.
pub async fn active_store(gateway: &dyn Gateway, slug: &str) -> Result<Store, ApiError> {
    gateway
        .find_store_by_slug(slug)
        .await?
        .filter(|store| store.is_active)
        .ok_or_else(|| ApiError::not_found("Store not found"))
}
