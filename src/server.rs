use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers;
use crate::middleware::tenant_router_middleware;
use crate::state::AppState;

/// Full application router with the tenant router in front of every route
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(store_routes())
        .merge(dashboard_routes())
        .route("/api/ai/chat", post(handlers::public::ai::chat_post))
        // Global middleware
        .layer(middleware::from_fn_with_state(state.clone(), tenant_router_middleware))
        .layer(TraceLayer::new_for_http());

    if state.config().security.enable_cors {
        router = router.layer(cors_layer(&state.config().security));
    }

    router.with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let bind_addr = format!("{}:{}", state.config().server.host, state.config().server.port);
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Storefront API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state)).await
}

fn auth_routes() -> Router<AppState> {
    use handlers::protected::auth as session;
    use handlers::public::auth;

    Router::new()
        // Sellers
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/logout", post(auth::logout_post))
        .route("/api/auth/me", get(session::me_get))
        // Store customers
        .route("/api/auth/store-register", post(auth::store_register_post))
        .route("/api/auth/store-login", post(auth::store_login_post))
        .route("/api/auth/verify-store-token", get(session::verify_store_token_get))
}

fn store_routes() -> Router<AppState> {
    use handlers::protected::store as customer;
    use handlers::public::store;

    Router::new()
        .route("/api/store/by-domain/:domain", get(store::store_by_domain_get))
        .route("/api/store/:slug", get(store::store_get))
        .route("/api/store/:slug/products", get(store::products_get))
        .route("/api/store/:slug/categories", get(store::categories_get))
        .route("/api/store/:slug/account", get(customer::account_get))
        .route("/api/store/:slug/orders", get(customer::orders_get))
}

fn dashboard_routes() -> Router<AppState> {
    use handlers::protected::dashboard;

    Router::new()
        .route("/api/dashboard/orders/:id", patch(dashboard::order_patch))
        .route("/api/dashboard/stats", get(dashboard::stats_get))
}

/// Explicit origins allow credentialed (cookie) requests; no origins means permissive
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Storefront API",
            "version": version,
            "description": "Multi-tenant storefront backend built with Rust (Axum)",
            "endpoints": {
                "health": "/health (public)",
                "seller_auth": "/api/auth/register, /api/auth/login, /api/auth/logout (public), /api/auth/me (seller token)",
                "customer_auth": "/api/auth/store-register, /api/auth/store-login (public), /api/auth/verify-store-token (store token)",
                "store": "/api/store/:slug[/products|/categories], /api/store/by-domain/:domain (public)",
                "customer": "/api/store/:slug/account, /api/store/:slug/orders (store token)",
                "dashboard": "/api/dashboard/orders/:id, /api/dashboard/stats (seller token)",
                "ai": "/api/ai/chat (public)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.gateway().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
