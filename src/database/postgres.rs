use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::gateway::Gateway;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Category, NewCustomer, NewSeller, NewStore, Order, OrderStatus, Product, ProductQuery,
    ProductSort, ProductStatus, SellerProfile, SellerUser, Store, StoreCustomer,
};

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, created_at, updated_at";
const PROFILE_COLUMNS: &str =
    "id, user_id, store_name, store_description, created_at, updated_at";
const STORE_COLUMNS: &str =
    "id, seller_id, slug, name, description, custom_domain, is_active, created_at, updated_at";
const CUSTOMER_COLUMNS: &str =
    "id, store_id, email, password_hash, first_name, last_name, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "p.id, p.store_id, p.category_id, p.name, p.slug, p.description, \
     p.price, p.compare_at_price, p.inventory, p.featured, p.status, p.created_at, p.updated_at";
const ORDER_COLUMNS: &str =
    "id, store_id, customer_id, order_number, status, total, created_at, updated_at";

/// [`Gateway`] backed by Postgres through sqlx
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<SellerUser>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, SellerUser>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<SellerUser>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        Ok(sqlx::query_as::<_, SellerUser>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_seller(&self, seller: NewSeller) -> Result<(SellerUser, SellerProfile), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let user_sql = format!(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, role) \
             VALUES ($1, $2, $3, $4, $5, 'SELLER') RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, SellerUser>(&user_sql)
            .bind(Uuid::new_v4())
            .bind(&seller.email)
            .bind(&seller.password_hash)
            .bind(&seller.first_name)
            .bind(&seller.last_name)
            .fetch_one(&mut *tx)
            .await?;

        let profile_sql = format!(
            "INSERT INTO seller_profiles (id, user_id, store_name, store_description) \
             VALUES ($1, $2, $3, $4) RETURNING {PROFILE_COLUMNS}"
        );
        let profile = sqlx::query_as::<_, SellerProfile>(&profile_sql)
            .bind(Uuid::new_v4())
            .bind(user.id)
            .bind(&seller.store_name)
            .bind(&seller.store_description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((user, profile))
    }

    async fn find_profile_by_user(&self, user_id: Uuid) -> Result<Option<SellerProfile>, DatabaseError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM seller_profiles WHERE user_id = $1");
        Ok(sqlx::query_as::<_, SellerProfile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn stores_for_seller(&self, seller_id: Uuid) -> Result<Vec<Store>, DatabaseError> {
        let sql = format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE seller_id = $1 ORDER BY created_at ASC"
        );
        Ok(sqlx::query_as::<_, Store>(&sql)
            .bind(seller_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stores WHERE slug = $1")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }

    async fn create_store(&self, store: NewStore) -> Result<Store, DatabaseError> {
        let sql = format!(
            "INSERT INTO stores (id, seller_id, slug, name, description, custom_domain, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, true) RETURNING {STORE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Store>(&sql)
            .bind(Uuid::new_v4())
            .bind(store.seller_id)
            .bind(&store.slug)
            .bind(&store.name)
            .bind(&store.description)
            .bind(&store.custom_domain)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_store_by_id(&self, id: Uuid) -> Result<Option<Store>, DatabaseError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1");
        Ok(sqlx::query_as::<_, Store>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_store_by_slug(&self, slug: &str) -> Result<Option<Store>, DatabaseError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE slug = $1");
        Ok(sqlx::query_as::<_, Store>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_store_by_domain(&self, domain: &str) -> Result<Option<Store>, DatabaseError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE lower(custom_domain) = lower($1)");
        Ok(sqlx::query_as::<_, Store>(&sql)
            .bind(domain)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_customer_by_id(&self, id: Uuid) -> Result<Option<StoreCustomer>, DatabaseError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM store_customers WHERE id = $1");
        Ok(sqlx::query_as::<_, StoreCustomer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_customer_by_email(
        &self,
        store_id: Uuid,
        email: &str,
    ) -> Result<Option<StoreCustomer>, DatabaseError> {
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM store_customers WHERE store_id = $1 AND lower(email) = lower($2)"
        );
        Ok(sqlx::query_as::<_, StoreCustomer>(&sql)
            .bind(store_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<StoreCustomer, DatabaseError> {
        let sql = format!(
            "INSERT INTO store_customers (id, store_id, email, password_hash, first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CUSTOMER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, StoreCustomer>(&sql)
            .bind(Uuid::new_v4())
            .bind(customer.store_id)
            .bind(&customer.email)
            .bind(&customer.password_hash)
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_products(&self, store_id: Uuid, query: &ProductQuery) -> Result<Vec<Product>, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p LEFT JOIN categories c ON c.id = p.category_id WHERE p.store_id = "
        ));
        builder.push_bind(store_id);
        builder.push(" AND p.status = ");
        builder.push_bind(ProductStatus::Active);

        if let Some(category) = &query.category_slug {
            builder.push(" AND c.slug = ");
            builder.push_bind(category.clone());
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", escape_like(search));
            builder.push(" AND (p.name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        if query.featured_only {
            builder.push(" AND p.featured = true");
        }

        builder.push(match query.sort {
            ProductSort::Newest => " ORDER BY p.created_at DESC",
            ProductSort::PriceAsc => " ORDER BY p.price ASC",
            ProductSort::PriceDesc => " ORDER BY p.price DESC",
            ProductSort::Name => " ORDER BY p.name ASC",
        });
        builder.push(" LIMIT ");
        builder.push_bind(query.limit);

        Ok(builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_categories(&self, store_id: Uuid) -> Result<Vec<Category>, DatabaseError> {
        Ok(sqlx::query_as::<_, Category>(
            "SELECT id, store_id, name, slug, description, created_at FROM categories \
             WHERE store_id = $1 ORDER BY name ASC",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, DatabaseError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        Ok(sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, DatabaseError> {
        let sql = format!(
            "UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("order {id}")))
    }

    async fn list_customer_orders(
        &self,
        store_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<Order>, DatabaseError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE store_id = $1 AND customer_id = $2 \
             ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Order>(&sql)
            .bind(store_id)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?)
    }
}

/// Escape LIKE wildcards in user-supplied search text
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("mug"), "mug");
    }
}
