use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::gateway::Gateway;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, NewCustomer, NewSeller, NewStore, Order, OrderStatus, Product, ProductQuery,
    ProductSort, ProductStatus, Role, SellerProfile, SellerUser, Store, StoreCustomer,
};

#[derive(Default)]
struct Tables {
    users: Vec<SellerUser>,
    profiles: Vec<SellerProfile>,
    stores: Vec<Store>,
    customers: Vec<StoreCustomer>,
    categories: Vec<Category>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

/// In-process [`Gateway`] used by `serve --in-memory` and the test suite.
///
/// Enforces the same uniqueness rules as the Postgres schema. Each method
/// holds the lock for its whole body, matching single-statement atomicity.
#[derive(Default)]
pub struct MemoryGateway {
    tables: RwLock<Tables>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category. Catalog management has no HTTP surface.
    pub async fn insert_category(&self, store_id: Uuid, name: &str, slug: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            store_id,
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            created_at: Utc::now(),
        };
        self.tables.write().await.categories.push(category.clone());
        category
    }

    /// Seed a product with the given status
    pub async fn insert_product(
        &self,
        store_id: Uuid,
        category_id: Option<Uuid>,
        name: &str,
        price: Decimal,
        status: ProductStatus,
    ) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            store_id,
            category_id,
            name: name.to_string(),
            slug: crate::services::slug::slugify(name),
            description: None,
            price,
            compare_at_price: None,
            inventory: 10,
            featured: false,
            status,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.products.push(product.clone());
        product
    }

    /// Seed an order for a store, optionally tied to a customer
    pub async fn insert_order(&self, store_id: Uuid, customer_id: Option<Uuid>, total: Decimal) -> Order {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            store_id,
            customer_id,
            order_number: format!("ORD-{:05}", tables.orders.len() + 1),
            status: OrderStatus::Pending,
            total,
            created_at: now,
            updated_at: now,
        };
        tables.orders.push(order.clone());
        order
    }

    /// Flip a store's active flag
    pub async fn set_store_active(&self, store_id: Uuid, active: bool) {
        let mut tables = self.tables.write().await;
        if let Some(store) = tables.stores.iter_mut().find(|s| s.id == store_id) {
            store.is_active = active;
            store.updated_at = Utc::now();
        }
    }

    /// Attach a custom domain to a store
    pub async fn set_custom_domain(&self, store_id: Uuid, domain: &str) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let taken = tables.stores.iter().any(|s| {
            s.id != store_id
                && s.custom_domain
                    .as_deref()
                    .is_some_and(|d| d.eq_ignore_ascii_case(domain))
        });
        if taken {
            return Err(DatabaseError::Conflict("stores_custom_domain_key".to_string()));
        }
        if let Some(store) = tables.stores.iter_mut().find(|s| s.id == store_id) {
            store.custom_domain = Some(domain.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<SellerUser>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<SellerUser>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_seller(&self, seller: NewSeller) -> Result<(SellerUser, SellerProfile), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(&seller.email)) {
            return Err(DatabaseError::Conflict("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = SellerUser {
            id: Uuid::new_v4(),
            email: seller.email,
            password_hash: seller.password_hash,
            first_name: seller.first_name,
            last_name: seller.last_name,
            role: Role::Seller,
            created_at: now,
            updated_at: now,
        };
        let profile = SellerProfile {
            id: Uuid::new_v4(),
            user_id: user.id,
            store_name: seller.store_name,
            store_description: seller.store_description,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        tables.profiles.push(profile.clone());
        Ok((user, profile))
    }

    async fn find_profile_by_user(&self, user_id: Uuid) -> Result<Option<SellerProfile>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn stores_for_seller(&self, seller_id: Uuid) -> Result<Vec<Store>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut stores: Vec<Store> = tables
            .stores
            .iter()
            .filter(|s| s.seller_id == seller_id)
            .cloned()
            .collect();
        stores.sort_by_key(|s| s.created_at);
        Ok(stores)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.stores.iter().any(|s| s.slug == slug))
    }

    async fn create_store(&self, store: NewStore) -> Result<Store, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.stores.iter().any(|s| s.slug == store.slug) {
            return Err(DatabaseError::Conflict("stores_slug_key".to_string()));
        }
        if let Some(domain) = &store.custom_domain {
            let taken = tables.stores.iter().any(|s| {
                s.custom_domain
                    .as_deref()
                    .is_some_and(|d| d.eq_ignore_ascii_case(domain))
            });
            if taken {
                return Err(DatabaseError::Conflict("stores_custom_domain_key".to_string()));
            }
        }

        let now = Utc::now();
        let created = Store {
            id: Uuid::new_v4(),
            seller_id: store.seller_id,
            slug: store.slug,
            name: store.name,
            description: store.description,
            custom_domain: store.custom_domain,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.stores.push(created.clone());
        Ok(created)
    }

    async fn find_store_by_id(&self, id: Uuid) -> Result<Option<Store>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.stores.iter().find(|s| s.id == id).cloned())
    }

    async fn find_store_by_slug(&self, slug: &str) -> Result<Option<Store>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.stores.iter().find(|s| s.slug == slug).cloned())
    }

    async fn find_store_by_domain(&self, domain: &str) -> Result<Option<Store>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .iter()
            .find(|s| {
                s.custom_domain
                    .as_deref()
                    .is_some_and(|d| d.eq_ignore_ascii_case(domain))
            })
            .cloned())
    }

    async fn find_customer_by_id(&self, id: Uuid) -> Result<Option<StoreCustomer>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn find_customer_by_email(
        &self,
        store_id: Uuid,
        email: &str,
    ) -> Result<Option<StoreCustomer>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .customers
            .iter()
            .find(|c| c.store_id == store_id && c.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<StoreCustomer, DatabaseError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .customers
            .iter()
            .any(|c| c.store_id == customer.store_id && c.email.eq_ignore_ascii_case(&customer.email));
        if taken {
            return Err(DatabaseError::Conflict("store_customers_store_email_key".to_string()));
        }

        let now = Utc::now();
        let created = StoreCustomer {
            id: Uuid::new_v4(),
            store_id: customer.store_id,
            email: customer.email,
            password_hash: customer.password_hash,
            first_name: customer.first_name,
            last_name: customer.last_name,
            created_at: now,
            updated_at: now,
        };
        tables.customers.push(created.clone());
        Ok(created)
    }

    async fn list_products(&self, store_id: Uuid, query: &ProductQuery) -> Result<Vec<Product>, DatabaseError> {
        let tables = self.tables.read().await;

        let category_id = match &query.category_slug {
            Some(slug) => match tables
                .categories
                .iter()
                .find(|c| c.store_id == store_id && &c.slug == slug)
            {
                Some(category) => Some(category.id),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        let needle = query.search.as_ref().map(|s| s.to_lowercase());

        let mut products: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| p.store_id == store_id && p.status == ProductStatus::Active)
            .filter(|p| category_id.is_none() || p.category_id == category_id)
            .filter(|p| !query.featured_only || p.featured)
            .filter(|p| match &needle {
                Some(needle) => {
                    p.name.to_lowercase().contains(needle)
                        || p.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(needle))
                }
                None => true,
            })
            .cloned()
            .collect();

        match query.sort {
            ProductSort::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ProductSort::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::Name => products.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        products.truncate(usize::try_from(query.limit).unwrap_or(0));
        Ok(products)
    }

    async fn list_categories(&self, store_id: Uuid) -> Result<Vec<Category>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| c.store_id == store_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, DatabaseError> {
        let mut tables = self.tables.write().await;
        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("order {id}")))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn list_customer_orders(
        &self,
        store_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<Order>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| o.store_id == store_id && o.customer_id == Some(customer_id))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_seller(email: &str) -> NewSeller {
        NewSeller {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: None,
            last_name: None,
            store_name: "Acme".to_string(),
            store_description: None,
        }
    }

    async fn seeded_store(gateway: &MemoryGateway) -> Store {
        let (_, profile) = gateway.create_seller(new_seller("owner@acme.test")).await.unwrap();
        gateway
            .create_store(NewStore {
                seller_id: profile.id,
                slug: "acme".to_string(),
                name: "Acme".to_string(),
                description: None,
                custom_domain: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let gateway = MemoryGateway::new();
        gateway.create_seller(new_seller("a@b.test")).await.unwrap();
        let err = gateway.create_seller(new_seller("A@B.test")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let gateway = MemoryGateway::new();
        let store = seeded_store(&gateway).await;
        let err = gateway
            .create_store(NewStore {
                seller_id: store.seller_id,
                slug: "acme".to_string(),
                name: "Other".to_string(),
                description: None,
                custom_domain: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn listing_hides_inactive_products_and_filters_by_category() {
        let gateway = MemoryGateway::new();
        let store = seeded_store(&gateway).await;
        let mugs = gateway.insert_category(store.id, "Mugs", "mugs").await;
        gateway
            .insert_product(store.id, Some(mugs.id), "Blue Mug", Decimal::new(1200, 2), ProductStatus::Active)
            .await;
        gateway
            .insert_product(store.id, None, "Poster", Decimal::new(900, 2), ProductStatus::Active)
            .await;
        gateway
            .insert_product(store.id, Some(mugs.id), "Draft Mug", Decimal::new(500, 2), ProductStatus::Draft)
            .await;

        let all = gateway.list_products(store.id, &ProductQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let query = ProductQuery {
            category_slug: Some("mugs".to_string()),
            ..ProductQuery::default()
        };
        let only_mugs = gateway.list_products(store.id, &query).await.unwrap();
        assert_eq!(only_mugs.len(), 1);
        assert_eq!(only_mugs[0].name, "Blue Mug");

        let query = ProductQuery {
            sort: ProductSort::PriceAsc,
            ..ProductQuery::default()
        };
        let cheapest_first = gateway.list_products(store.id, &query).await.unwrap();
        assert_eq!(cheapest_first[0].name, "Poster");
    }

    #[tokio::test]
    async fn customer_email_is_unique_per_store_only() {
        let gateway = MemoryGateway::new();
        let store = seeded_store(&gateway).await;
        let other = gateway
            .create_store(NewStore {
                seller_id: store.seller_id,
                slug: "other".to_string(),
                name: "Other".to_string(),
                description: None,
                custom_domain: None,
            })
            .await
            .unwrap();

        let customer = |store_id| NewCustomer {
            store_id,
            email: "shopper@test".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Shopper".to_string(),
        };
        gateway.create_customer(customer(store.id)).await.unwrap();
        gateway.create_customer(customer(other.id)).await.unwrap();
        let err = gateway.create_customer(customer(store.id)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }
}
