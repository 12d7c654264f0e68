use serde::Serialize;

use crate::auth::password::{hash_password, PasswordError};
use crate::database::models::{NewCustomer, NewSeller, NewStore, SellerProfile, SellerUser, Store, StoreCustomer};
use crate::database::{DatabaseError, Gateway};
use crate::services::slug::{next_free_slug, slugify};

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("email already registered")]
    EmailTaken,
    #[error("no free slug for base '{0}'")]
    SlugSpaceExhausted(String),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Validated seller sign-up input
#[derive(Debug, Clone)]
pub struct SellerSignup {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub store_name: String,
    pub store_description: Option<String>,
}

/// Validated store customer sign-up input
#[derive(Debug, Clone)]
pub struct CustomerSignup {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisteredSeller {
    pub user: SellerUser,
    pub profile: SellerProfile,
    pub store: Store,
}

/// Create a seller, its profile and its first store.
///
/// User and profile are written together; the store follows in a separate
/// statement. The slug is chosen check-then-create, and an insert that loses
/// a race on `stores_slug_key` moves on to the next suffix instead of failing.
pub async fn register_seller(
    gateway: &dyn Gateway,
    signup: SellerSignup,
) -> Result<RegisteredSeller, RegistrationError> {
    if gateway.find_user_by_email(&signup.email).await?.is_some() {
        return Err(RegistrationError::EmailTaken);
    }

    let password_hash = hash_password(&signup.password)?;
    let (user, profile) = gateway
        .create_seller(NewSeller {
            email: signup.email,
            password_hash,
            first_name: signup.first_name,
            last_name: signup.last_name,
            store_name: signup.store_name.clone(),
            store_description: signup.store_description.clone(),
        })
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => RegistrationError::EmailTaken,
            other => other.into(),
        })?;

    let store = create_store_with_unique_slug(
        gateway,
        NewStore {
            seller_id: profile.id,
            slug: String::new(),
            name: signup.store_name,
            description: signup.store_description,
            custom_domain: None,
        },
    )
    .await?;

    tracing::info!("Registered seller {} with store '{}'", user.id, store.slug);
    Ok(RegisteredSeller { user, profile, store })
}

/// Insert `store` under the first free slug derived from its name
pub async fn create_store_with_unique_slug(
    gateway: &dyn Gateway,
    mut store: NewStore,
) -> Result<Store, RegistrationError> {
    let base = slugify(&store.name);
    let mut start = 0;

    loop {
        let (attempt, slug) = next_free_slug(gateway, &base, start)
            .await?
            .ok_or_else(|| RegistrationError::SlugSpaceExhausted(base.clone()))?;

        store.slug = slug;
        match gateway.create_store(store.clone()).await {
            Ok(created) => return Ok(created),
            Err(DatabaseError::Conflict(constraint)) if constraint.contains("slug") => {
                tracing::warn!("Slug '{}' taken concurrently, trying next suffix", store.slug);
                start = attempt + 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Create a customer account inside one store. Emails are unique per store.
pub async fn register_customer(
    gateway: &dyn Gateway,
    store: &Store,
    signup: CustomerSignup,
) -> Result<StoreCustomer, RegistrationError> {
    if gateway
        .find_customer_by_email(store.id, &signup.email)
        .await?
        .is_some()
    {
        return Err(RegistrationError::EmailTaken);
    }

    let password_hash = hash_password(&signup.password)?;
    let customer = gateway
        .create_customer(NewCustomer {
            store_id: store.id,
            email: signup.email,
            password_hash,
            first_name: signup.first_name,
            last_name: signup.last_name,
        })
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => RegistrationError::EmailTaken,
            other => other.into(),
        })?;

    tracing::info!("Registered customer {} in store '{}'", customer.id, store.slug);
    Ok(customer)
}
