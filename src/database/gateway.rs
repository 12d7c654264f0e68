use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, NewCustomer, NewSeller, NewStore, Order, OrderStatus, Product, ProductQuery,
    SellerProfile, SellerUser, Store, StoreCustomer,
};

/// The single path from handlers to the relational store.
///
/// Implementations guarantee single-statement atomicity and enforce the
/// uniqueness rules (user email, store slug, store custom domain, customer
/// email per store) by returning [`DatabaseError::Conflict`]. Nothing
/// spanning two calls is transactional.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Sellers
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<SellerUser>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<SellerUser>, DatabaseError>;
    /// Insert a user and its profile together
    async fn create_seller(&self, seller: NewSeller) -> Result<(SellerUser, SellerProfile), DatabaseError>;
    async fn find_profile_by_user(&self, user_id: Uuid) -> Result<Option<SellerProfile>, DatabaseError>;

    // Stores
    /// Stores owned by a profile, oldest first
    async fn stores_for_seller(&self, seller_id: Uuid) -> Result<Vec<Store>, DatabaseError>;
    async fn slug_exists(&self, slug: &str) -> Result<bool, DatabaseError>;
    async fn create_store(&self, store: NewStore) -> Result<Store, DatabaseError>;
    async fn find_store_by_id(&self, id: Uuid) -> Result<Option<Store>, DatabaseError>;
    async fn find_store_by_slug(&self, slug: &str) -> Result<Option<Store>, DatabaseError>;
    async fn find_store_by_domain(&self, domain: &str) -> Result<Option<Store>, DatabaseError>;

    // Store customers
    async fn find_customer_by_id(&self, id: Uuid) -> Result<Option<StoreCustomer>, DatabaseError>;
    async fn find_customer_by_email(
        &self,
        store_id: Uuid,
        email: &str,
    ) -> Result<Option<StoreCustomer>, DatabaseError>;
    async fn create_customer(&self, customer: NewCustomer) -> Result<StoreCustomer, DatabaseError>;

    // Catalog
    async fn list_products(&self, store_id: Uuid, query: &ProductQuery) -> Result<Vec<Product>, DatabaseError>;
    async fn list_categories(&self, store_id: Uuid) -> Result<Vec<Category>, DatabaseError>;

    // Orders
    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, DatabaseError>;
    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, DatabaseError>;
    /// A customer's orders within one store, newest first
    async fn list_customer_orders(
        &self,
        store_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<Order>, DatabaseError>;
}
