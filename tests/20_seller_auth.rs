mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{contains_key, session_cookie, set_cookie_header};

#[tokio::test]
async fn register_creates_active_store_with_derived_slug() -> Result<()> {
    let server = common::start_server().await?;

    let (data, _) = server.register_seller("ada@example.com", "Acme").await?;
    assert_eq!(data["store"]["slug"], "acme");
    assert_eq!(data["user"]["email"], "ada@example.com");
    assert_eq!(data["user"]["role"], "SELLER");
    assert_eq!(data["profile"]["storeName"], "Acme");
    assert!(data["token"].as_str().is_some_and(|t| !t.is_empty()));

    let res = server.get("/api/store/acme").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["slug"], "acme");
    assert_eq!(body["data"]["isActive"], true);
    Ok(())
}

#[tokio::test]
async fn register_sets_http_only_seller_cookie() -> Result<()> {
    let server = common::start_server().await?;

    let res = server
        .post(
            "/api/auth/register",
            json!({ "email": "c@example.com", "password": "password123", "storeName": "Cookie Co" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let header = set_cookie_header(&res).expect("Set-Cookie");
    assert!(header.starts_with("seller_token="));
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("SameSite=Lax"));
    assert!(!header.contains("Secure"), "development cookies are not Secure");
    Ok(())
}

#[tokio::test]
async fn same_store_name_gets_suffixed_slug() -> Result<()> {
    let server = common::start_server().await?;

    let (first, _) = server.register_seller("one@example.com", "My Shop!").await?;
    let (second, _) = server.register_seller("two@example.com", "My Shop!").await?;

    assert_eq!(first["store"]["slug"], "my-shop");
    assert_eq!(second["store"]["slug"], "my-shop-1");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> Result<()> {
    let server = common::start_server().await?;
    server.register_seller("dup@example.com", "First").await?;

    let res = server
        .post(
            "/api/auth/register",
            json!({ "email": "dup@example.com", "password": "password123", "storeName": "Second" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "User already exists");
    Ok(())
}

#[tokio::test]
async fn register_validates_input() -> Result<()> {
    let server = common::start_server().await?;

    let cases = [
        (json!({ "email": "x@example.com", "password": "password123" }), "storeName"),
        (json!({ "email": "not-an-email", "password": "password123", "storeName": "S" }), "email"),
        (json!({ "email": "x@example.com", "password": "short", "storeName": "S" }), "password"),
    ];
    for (body, field) in cases {
        let res = server.post("/api/auth/register", body).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await?;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"][field].is_string(), "missing field error for {field}");
    }

    let res = server
        .client
        .post(server.url("/api/auth/register"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn login_me_and_logout() -> Result<()> {
    let server = common::start_server().await?;
    server.register_seller("ada@example.com", "Acme").await?;

    let res = server
        .post("/api/auth/login", json!({ "email": "ADA@example.com", "password": "password123" }))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).expect("seller cookie");
    let body: Value = res.json().await?;
    let token = body["data"]["token"].as_str().unwrap_or_default().to_string();

    // Cookie and bearer header both authenticate
    let me: Value = server.get_with_cookie("/api/auth/me", &cookie).await?.json().await?;
    assert_eq!(me["data"]["user"]["email"], "ada@example.com");
    assert_eq!(me["data"]["store"]["slug"], "acme");

    let res = server
        .client
        .get(server.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.post("/api/auth/logout", json!({})).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let header = set_cookie_header(&res).expect("logout clears cookie");
    assert!(header.starts_with("seller_token=;"));
    assert!(header.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> Result<()> {
    let server = common::start_server().await?;
    server.register_seller("ada@example.com", "Acme").await?;

    for body in [
        json!({ "email": "ada@example.com", "password": "wrong-password" }),
        json!({ "email": "nobody@example.com", "password": "password123" }),
    ] {
        let res = server.post("/api/auth/login", body).await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await?;
        assert_eq!(body["error"], "Invalid credentials");
    }
    Ok(())
}

#[tokio::test]
async fn me_rejects_missing_and_bad_tokens() -> Result<()> {
    let server = common::start_server().await?;

    let res = server.get("/api/auth/me").await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Authentication required");

    let res = server.get_with_cookie("/api/auth/me", "seller_token=garbage").await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Invalid token");
    Ok(())
}

#[tokio::test]
async fn credential_field_never_leaks() -> Result<()> {
    let server = common::start_server().await?;
    let (registered, cookie) = server.register_seller("ada@example.com", "Acme").await?;
    let (customer, _) = server.register_customer("acme", "sam@example.com").await?;
    let me: Value = server.get_with_cookie("/api/auth/me", &cookie).await?.json().await?;

    for body in [&registered, &customer, &me] {
        assert!(!contains_key(body, "password"));
        assert!(!contains_key(body, "passwordHash"));
    }
    Ok(())
}
