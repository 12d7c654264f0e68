#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use reqwest::{header, Response, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use storefront_api::config::AppConfig;
use storefront_api::database::models::{
    Category, NewCustomer, NewSeller, NewStore, Order, OrderStatus, Product, ProductQuery,
    SellerProfile, SellerUser, Store, StoreCustomer,
};
use storefront_api::database::{DatabaseError, Gateway, MemoryGateway};
use storefront_api::server;
use storefront_api::services::CompletionClient;
use storefront_api::AppState;

/// Reply the fake completion service gives to every request
pub const ORACLE_REPLY: &str = "Happy to help! Our mugs are very popular.";

/// One isolated server per test: fresh in-memory store, fake completion service
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub gateway: Arc<MemoryGateway>,
    pub faults: Arc<Faults>,
    pub oracle: Arc<FakeOracle>,
    pub client: reqwest::Client,
}

impl TestServer {
    async fn start() -> Result<Self> {
        let oracle = Arc::new(FakeOracle::default());
        let oracle_url = spawn_oracle(oracle.clone()).await?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        config.security.jwt_secret = "integration-test-secret".to_string();
        config.ai.base_url = oracle_url;

        let gateway = Arc::new(MemoryGateway::new());
        let faults = Arc::new(Faults::default());
        let chat = CompletionClient::from_config(&config.ai)?;
        let dyn_gateway: Arc<dyn Gateway> = Arc::new(FaultyGateway {
            inner: gateway.clone(),
            faults: faults.clone(),
        });
        let state = AppState::new(config, dyn_gateway, chat);

        tokio::spawn(async move {
            if let Err(e) = server::serve(state).await {
                eprintln!("test server stopped: {e}");
            }
        });

        let server = Self {
            port,
            base_url,
            gateway,
            faults,
            oracle,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = self.client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .header(header::COOKIE, cookie)
            .send()
            .await?)
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(&body).send().await?)
    }

    /// Register a seller; returns the response body's `data` and the `seller_token` cookie
    pub async fn register_seller(&self, email: &str, store_name: &str) -> Result<(Value, String)> {
        let res = self
            .post(
                "/api/auth/register",
                json!({
                    "email": email,
                    "password": "password123",
                    "firstName": "Ada",
                    "storeName": store_name
                }),
            )
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        let cookie = session_cookie(&res).context("register did not set a cookie")?;
        let body: Value = res.json().await?;
        Ok((body["data"].clone(), cookie))
    }

    /// Register a customer of `store_slug`; returns `data` and the `store_token` cookie
    pub async fn register_customer(&self, store_slug: &str, email: &str) -> Result<(Value, String)> {
        let res = self
            .post(
                "/api/auth/store-register",
                json!({
                    "storeSlug": store_slug,
                    "email": email,
                    "password": "password123",
                    "firstName": "Sam",
                    "lastName": "Shopper"
                }),
            )
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "store-register failed: {}", res.status());
        let cookie = session_cookie(&res).context("store-register did not set a cookie")?;
        let body: Value = res.json().await?;
        Ok((body["data"].clone(), cookie))
    }

    pub async fn store(&self, slug: &str) -> Result<Store> {
        self.gateway
            .find_store_by_slug(slug)
            .await?
            .with_context(|| format!("store {slug} missing"))
    }
}

pub async fn start_server() -> Result<TestServer> {
    TestServer::start().await
}

/// `name=value` of the first `Set-Cookie` header, ready for a `Cookie` header
pub fn session_cookie(res: &Response) -> Option<String> {
    let raw = res.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(|pair| pair.trim().to_string())
}

/// Raw `Set-Cookie` header value
pub fn set_cookie_header(res: &Response) -> Option<String> {
    Some(res.headers().get(header::SET_COOKIE)?.to_str().ok()?.to_string())
}

/// True when any object key anywhere in `value` is `key`
pub fn contains_key(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(map) => map.iter().any(|(k, v)| k == key || contains_key(v, key)),
        Value::Array(items) => items.iter().any(|v| contains_key(v, key)),
        _ => false,
    }
}

/// Failure switches consulted by the server's gateway before delegating
#[derive(Default)]
pub struct Faults {
    pub order_updates: AtomicBool,
}

impl Faults {
    pub fn fail_order_updates(&self) {
        self.order_updates.store(true, Ordering::SeqCst);
    }
}

/// The in-memory gateway, with switchable failures
struct FaultyGateway {
    inner: Arc<MemoryGateway>,
    faults: Arc<Faults>,
}

#[async_trait]
impl Gateway for FaultyGateway {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.inner.health_check().await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<SellerUser>, DatabaseError> {
        self.inner.find_user_by_id(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<SellerUser>, DatabaseError> {
        self.inner.find_user_by_email(email).await
    }

    async fn create_seller(&self, seller: NewSeller) -> Result<(SellerUser, SellerProfile), DatabaseError> {
        self.inner.create_seller(seller).await
    }

    async fn find_profile_by_user(&self, user_id: Uuid) -> Result<Option<SellerProfile>, DatabaseError> {
        self.inner.find_profile_by_user(user_id).await
    }

    async fn stores_for_seller(&self, seller_id: Uuid) -> Result<Vec<Store>, DatabaseError> {
        self.inner.stores_for_seller(seller_id).await
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DatabaseError> {
        self.inner.slug_exists(slug).await
    }

    async fn create_store(&self, store: NewStore) -> Result<Store, DatabaseError> {
        self.inner.create_store(store).await
    }

    async fn find_store_by_id(&self, id: Uuid) -> Result<Option<Store>, DatabaseError> {
        self.inner.find_store_by_id(id).await
    }

    async fn find_store_by_slug(&self, slug: &str) -> Result<Option<Store>, DatabaseError> {
        self.inner.find_store_by_slug(slug).await
    }

    async fn find_store_by_domain(&self, domain: &str) -> Result<Option<Store>, DatabaseError> {
        self.inner.find_store_by_domain(domain).await
    }

    async fn find_customer_by_id(&self, id: Uuid) -> Result<Option<StoreCustomer>, DatabaseError> {
        self.inner.find_customer_by_id(id).await
    }

    async fn find_customer_by_email(
        &self,
        store_id: Uuid,
        email: &str,
    ) -> Result<Option<StoreCustomer>, DatabaseError> {
        self.inner.find_customer_by_email(store_id, email).await
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<StoreCustomer, DatabaseError> {
        self.inner.create_customer(customer).await
    }

    async fn list_products(&self, store_id: Uuid, query: &ProductQuery) -> Result<Vec<Product>, DatabaseError> {
        self.inner.list_products(store_id, query).await
    }

    async fn list_categories(&self, store_id: Uuid) -> Result<Vec<Category>, DatabaseError> {
        self.inner.list_categories(store_id).await
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, DatabaseError> {
        self.inner.find_order(id).await
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, DatabaseError> {
        if self.faults.order_updates.load(Ordering::SeqCst) {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        self.inner.update_order_status(id, status).await
    }

    async fn list_customer_orders(
        &self,
        store_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<Order>, DatabaseError> {
        self.inner.list_customer_orders(store_id, customer_id).await
    }
}

/// Fake completion service: records request bodies, replies with
/// [`ORACLE_REPLY`] or, once switched, with no choices at all
#[derive(Default)]
pub struct FakeOracle {
    requests: Mutex<Vec<Value>>,
    empty: AtomicBool,
}

impl FakeOracle {
    pub fn reply_empty(&self) {
        self.empty.store(true, Ordering::SeqCst);
    }

    pub fn last_request(&self) -> Option<Value> {
        self.requests.lock().ok()?.last().cloned()
    }
}

/// Minimal OpenAI-compatible completion endpoint
async fn spawn_oracle(oracle: Arc<FakeOracle>) -> Result<String> {
    async fn complete(State(oracle): State<Arc<FakeOracle>>, Json(body): Json<Value>) -> Json<Value> {
        if let Ok(mut requests) = oracle.requests.lock() {
            requests.push(body);
        }
        if oracle.empty.load(Ordering::SeqCst) {
            return Json(json!({ "id": "chatcmpl-test", "object": "chat.completion", "choices": [] }));
        }
        Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": ORACLE_REPLY },
                "finish_reason": "stop"
            }]
        }))
    }

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/v1/chat/completions", post(complete))
        .with_state(oracle);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{}/v1/", addr))
}
