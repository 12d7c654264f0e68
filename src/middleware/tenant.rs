// middleware/tenant.rs - per-store request routing and customer token gate
//
// Runs in front of every handler. It never touches persistence: store-scoped
// paths are classified from the URI alone and protected ones are checked
// against the `store_token` cookie with the token codec only.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::auth::cookies::{read_cookie, STORE_COOKIE};
use crate::auth::{AuthFailure, Identity, TokenError};
use crate::config::TenancyConfig;
use crate::error::ApiError;
use crate::services::slug::RESERVED_SLUG;
use crate::state::AppState;

pub const X_STORE_SLUG: HeaderName = HeaderName::from_static("x-store-slug");
pub const X_CUSTOMER_ID: HeaderName = HeaderName::from_static("x-customer-id");
pub const X_STORE_ID: HeaderName = HeaderName::from_static("x-store-id");
pub const X_CUSTOM_DOMAIN: HeaderName = HeaderName::from_static("x-custom-domain");

const INJECTED_HEADERS: [HeaderName; 4] = [X_STORE_SLUG, X_CUSTOMER_ID, X_STORE_ID, X_CUSTOM_DOMAIN];

const STORE_PREFIXES: [&str; 2] = ["/api/store/", "/store/"];

/// Path segments that make a store-scoped path public
const PUBLIC_SEGMENTS: [&str; 2] = ["products", "categories"];

/// Store customer auth endpoints the router also annotates
pub const CUSTOMER_AUTH_PATHS: [&str; 3] = [
    "/api/auth/store-login",
    "/api/auth/store-register",
    "/api/auth/verify-store-token",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass<'a> {
    /// Outside the router's scope; forwarded untouched
    Unscoped,
    /// Customer auth allow-list: custom-domain annotation only
    CustomerAuth,
    Public { store: &'a str },
    Protected { store: &'a str },
}

/// Split a store-scoped path into its store identifier and the remainder
fn split_store_path(path: &str) -> Option<(&str, &str)> {
    let rest = STORE_PREFIXES.iter().find_map(|prefix| path.strip_prefix(prefix))?;
    let (store, remainder) = rest.split_once('/').unwrap_or((rest, ""));
    (!store.is_empty()).then_some((store, remainder))
}

/// Store identifier: the segment right after `/store/` or `/api/store/`
pub fn store_identifier(path: &str) -> Option<&str> {
    split_store_path(path).map(|(store, _)| store)
}

pub fn classify(path: &str) -> RouteClass<'_> {
    let Some((store, remainder)) = split_store_path(path) else {
        if CUSTOMER_AUTH_PATHS.contains(&path) {
            return RouteClass::CustomerAuth;
        }
        return RouteClass::Unscoped;
    };

    if store == RESERVED_SLUG {
        return RouteClass::Public { store };
    }

    let mut segments = remainder.split('/').filter(|s| !s.is_empty()).peekable();

    // `/api/store/{slug}` itself is the public store lookup
    if segments.peek().is_none() || segments.any(|s| PUBLIC_SEGMENTS.contains(&s)) {
        RouteClass::Public { store }
    } else {
        RouteClass::Protected { store }
    }
}

/// Host that should be treated as a store's custom domain, port removed.
///
/// `None` for development hosts and for any platform-provided subdomain.
pub fn custom_domain(host: &str, tenancy: &TenancyConfig) -> Option<String> {
    let hostname = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
    .trim()
    .trim_end_matches('.')
    .to_ascii_lowercase();

    if hostname.is_empty() || tenancy.dev_hosts.iter().any(|h| h.eq_ignore_ascii_case(&hostname)) {
        return None;
    }

    let platform = tenancy.platform_domains.iter().any(|domain| {
        let domain = domain.to_ascii_lowercase();
        hostname == domain || hostname.ends_with(&format!(".{domain}"))
    });
    (!platform).then_some(hostname)
}

/// Tenant router middleware.
///
/// Strips client-supplied identity headers, annotates custom domains, and
/// short-circuits protected store paths whose `store_token` is missing,
/// invalid, or scoped to another store.
///
/// Injected headers on success:
/// ```text
/// x-store-slug:    acme
/// x-customer-id:   3f9c...   (protected paths)
/// x-store-id:      91ab...   (protected paths)
/// x-custom-domain: shop.acme.com
/// ```
pub async fn tenant_router_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path().to_string();
    let class = classify(&path);

    let headers = request.headers_mut();
    for name in INJECTED_HEADERS {
        headers.remove(name);
    }

    if class == RouteClass::Unscoped {
        return Ok(next.run(request).await);
    }

    let domain = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .and_then(|host| custom_domain(host, &state.config().tenancy));
    if let Some(domain) = domain {
        insert(headers, X_CUSTOM_DOMAIN, &domain);
    }

    match class {
        RouteClass::Public { store } if store != RESERVED_SLUG => {
            insert(headers, X_STORE_SLUG, store);
        }
        RouteClass::Protected { store } => {
            let (customer_id, store_id) = check_store_token(&state, headers, store)?;
            insert(headers, X_STORE_SLUG, store);
            insert(headers, X_CUSTOMER_ID, &customer_id);
            insert(headers, X_STORE_ID, &store_id);
        }
        _ => {}
    }

    Ok(next.run(request).await)
}

/// Verify the `store_token` cookie against the path's store slug
fn check_store_token(state: &AppState, headers: &HeaderMap, store: &str) -> Result<(String, String), AuthFailure> {
    let token = read_cookie(headers, STORE_COOKIE).ok_or(AuthFailure::Unauthenticated)?;

    match state.tokens().verify(&token)?.identity {
        Identity::Customer {
            customer_id,
            store_id,
            store_slug,
        } => {
            if store_slug != store {
                tracing::warn!("store_token for '{}' used on store '{}'", store_slug, store);
                return Err(AuthFailure::TenantMismatch);
            }
            Ok((customer_id.to_string(), store_id.to_string()))
        }
        Identity::Seller { .. } => Err(AuthFailure::InvalidToken(TokenError::Invalid(
            "seller token in store_token cookie".to_string(),
        ))),
    }
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

/// Read a router-injected header downstream
pub fn injected(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers.get(name)?.to_str().ok().map(str::to_string)
}
