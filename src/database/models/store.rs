use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant. Reachable by id, by slug, or by custom domain.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub custom_domain: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStore {
    /// Owning SellerProfile id
    pub seller_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub custom_domain: Option<String>,
}
