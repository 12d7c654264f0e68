use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Dashboard figures for one store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub store_id: Uuid,
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub total_products: i64,
    pub total_customers: i64,
}

impl DashboardStats {
    // TODO: aggregate orders, products and customers once the dashboard has a stats query
    pub fn for_store(store_id: Uuid) -> Self {
        Self {
            store_id,
            total_revenue: Decimal::ZERO,
            total_orders: 0,
            total_products: 0,
            total_customers: 0,
        }
    }
}
