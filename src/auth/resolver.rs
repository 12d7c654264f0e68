use axum::http::{header, HeaderMap};
use serde::Serialize;
use uuid::Uuid;

use super::cookies::{read_cookie, SELLER_COOKIE, STORE_COOKIE};
use super::{Identity, TokenCodec, TokenError};
use crate::database::models::{Role, SellerProfile, SellerUser, Store, StoreCustomer};
use crate::database::{DatabaseError, Gateway};

/// Which identity space an endpoint authenticates against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalKind {
    Seller,
    Customer,
}

impl PrincipalKind {
    /// Cookie consulted when no `Authorization` header is present
    pub fn cookie_name(self) -> &'static str {
        match self {
            PrincipalKind::Seller => SELLER_COOKIE,
            PrincipalKind::Customer => STORE_COOKIE,
        }
    }
}

/// A resolved seller. `store` is the implicit scope for store-mutating endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SellerPrincipal {
    pub user: SellerUser,
    pub profile: SellerProfile,
    pub store: Store,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerPrincipal {
    pub customer: StoreCustomer,
    pub store: Store,
}

#[derive(Debug, Clone)]
pub enum Principal {
    Seller(SellerPrincipal),
    Customer(CustomerPrincipal),
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Principal::Seller(seller) => seller.user.id,
            Principal::Customer(customer) => customer.customer.id,
        }
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Seller(_) => PrincipalKind::Seller,
            Principal::Customer(_) => PrincipalKind::Customer,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    #[error("no token presented")]
    Unauthenticated,
    #[error("token rejected: {0}")]
    InvalidToken(#[from] TokenError),
    #[error("token is scoped to a different store")]
    TenantMismatch,
    #[error("principal not found")]
    PrincipalNotFound,
    #[error("seller has no store")]
    StoreNotFound,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Turns request credentials into a [`Principal`].
///
/// One synchronous check per request: extract, verify, look up. No caching.
pub struct AuthResolver<'a> {
    tokens: &'a TokenCodec,
    gateway: &'a dyn Gateway,
}

impl<'a> AuthResolver<'a> {
    pub fn new(tokens: &'a TokenCodec, gateway: &'a dyn Gateway) -> Self {
        Self { tokens, gateway }
    }

    /// Extract, verify and look up the principal of `kind`.
    ///
    /// For customers, `expected` pins the store the token must be scoped to.
    /// Sellers ignore it and are scoped to their first store.
    pub async fn resolve(
        &self,
        headers: &HeaderMap,
        kind: PrincipalKind,
        expected: Option<&Store>,
    ) -> Result<Principal, AuthFailure> {
        let token = extract_token(headers, kind).ok_or(AuthFailure::Unauthenticated)?;

        let principal = match (kind, self.tokens.verify(&token)?.identity) {
            (PrincipalKind::Seller, Identity::Seller { user_id }) => {
                Principal::Seller(self.load_seller(user_id).await?)
            }
            (
                PrincipalKind::Customer,
                Identity::Customer {
                    customer_id,
                    store_id,
                    store_slug,
                },
            ) => Principal::Customer(
                self.load_customer(customer_id, store_id, &store_slug, expected)
                    .await?,
            ),
            (kind, _) => {
                return Err(AuthFailure::InvalidToken(TokenError::Invalid(format!(
                    "token kind does not match {kind:?} endpoint"
                ))))
            }
        };

        tracing::debug!("Resolved {:?} {}", principal.kind(), principal.id());
        Ok(principal)
    }

    /// Resolve a seller with role `SELLER` and at least one store
    pub async fn resolve_seller(&self, headers: &HeaderMap) -> Result<SellerPrincipal, AuthFailure> {
        match self.resolve(headers, PrincipalKind::Seller, None).await? {
            Principal::Seller(seller) => Ok(seller),
            Principal::Customer(_) => Err(AuthFailure::PrincipalNotFound),
        }
    }

    /// Resolve a store customer. When `expected` is given, the token must be scoped to that store.
    pub async fn resolve_customer(
        &self,
        headers: &HeaderMap,
        expected: Option<&Store>,
    ) -> Result<CustomerPrincipal, AuthFailure> {
        match self.resolve(headers, PrincipalKind::Customer, expected).await? {
            Principal::Customer(customer) => Ok(customer),
            Principal::Seller(_) => Err(AuthFailure::PrincipalNotFound),
        }
    }

    async fn load_seller(&self, user_id: Uuid) -> Result<SellerPrincipal, AuthFailure> {
        let user = self
            .gateway
            .find_user_by_id(user_id)
            .await?
            .filter(|u| u.role == Role::Seller)
            .ok_or(AuthFailure::PrincipalNotFound)?;

        let profile = self
            .gateway
            .find_profile_by_user(user.id)
            .await?
            .ok_or(AuthFailure::StoreNotFound)?;

        let store = self
            .gateway
            .stores_for_seller(profile.id)
            .await?
            .into_iter()
            .next()
            .ok_or(AuthFailure::StoreNotFound)?;

        Ok(SellerPrincipal { user, profile, store })
    }

    async fn load_customer(
        &self,
        customer_id: Uuid,
        store_id: Uuid,
        store_slug: &str,
        expected: Option<&Store>,
    ) -> Result<CustomerPrincipal, AuthFailure> {
        if let Some(store) = expected {
            if store.id != store_id || store.slug != store_slug {
                tracing::warn!(
                    "Customer token for store '{}' presented to store '{}'",
                    store_slug,
                    store.slug
                );
                return Err(AuthFailure::TenantMismatch);
            }
        }

        let customer = self
            .gateway
            .find_customer_by_id(customer_id)
            .await?
            .ok_or(AuthFailure::PrincipalNotFound)?;

        if customer.store_id != store_id {
            tracing::warn!("Customer {} does not belong to token store {}", customer.id, store_id);
            return Err(AuthFailure::TenantMismatch);
        }

        let store = match expected {
            Some(store) => store.clone(),
            None => self
                .gateway
                .find_store_by_id(store_id)
                .await?
                .ok_or(AuthFailure::TenantMismatch)?,
        };

        Ok(CustomerPrincipal { customer, store })
    }
}

/// `Authorization: Bearer` wins; otherwise the kind's cookie
pub fn extract_token(headers: &HeaderMap, kind: PrincipalKind) -> Option<String> {
    bearer_token(headers).or_else(|| read_cookie(headers, kind.cookie_name()))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}
