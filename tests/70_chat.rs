mod common;

use anyhow::Result;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use storefront_api::database::models::ProductStatus;

#[tokio::test]
async fn hello_gets_a_response() -> Result<()> {
    let server = common::start_server().await?;

    let res = server.post("/api/ai/chat", json!({ "message": "hello" })).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    let reply = body["data"]["response"].as_str().unwrap_or_default();
    assert!(!reply.is_empty());
    assert_eq!(reply, common::ORACLE_REPLY);
    Ok(())
}

#[tokio::test]
async fn history_and_store_context_are_accepted() -> Result<()> {
    let server = common::start_server().await?;
    server.register_seller("ada@example.com", "Acme").await?;

    let res = server
        .post(
            "/api/ai/chat",
            json!({
                "message": "any mugs?",
                "storeContext": { "storeSlug": "acme" },
                "conversationHistory": [
                    { "role": "user", "content": "hi" },
                    { "role": "assistant", "content": "Hello!" }
                ]
            }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let sent = server.oracle.last_request().expect("oracle was called");
    let roles: Vec<&str> = sent["messages"]
        .as_array()
        .map(|messages| messages.iter().filter_map(|m| m["role"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    assert_eq!(sent["messages"][1]["content"], "hi");
    assert_eq!(sent["messages"][2]["content"], "Hello!");
    assert_eq!(sent["messages"][3]["content"], "any mugs?");
    assert_eq!(sent["max_tokens"], 500);
    let temperature = sent["temperature"].as_f64().unwrap_or_default();
    assert!((temperature - 0.7).abs() < 1e-6);
    Ok(())
}

#[tokio::test]
async fn prompt_lists_at_most_five_store_products() -> Result<()> {
    let server = common::start_server().await?;
    server.register_seller("ada@example.com", "Acme").await?;
    let store = server.store("acme").await?;
    for i in 1..=7 {
        server
            .gateway
            .insert_product(store.id, None, &format!("Mug {i}"), Decimal::new(1000, 2), ProductStatus::Active)
            .await;
    }

    let res = server
        .post("/api/ai/chat", json!({ "message": "what do you sell?", "storeContext": { "storeSlug": "acme" } }))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let sent = server.oracle.last_request().expect("oracle was called");
    let prompt = sent["messages"][0]["content"].as_str().unwrap_or_default();
    assert!(prompt.contains("Acme"));
    assert_eq!(prompt.lines().filter(|line| line.starts_with("- Mug")).count(), 5);
    Ok(())
}

#[tokio::test]
async fn empty_completion_is_an_internal_error() -> Result<()> {
    let server = common::start_server().await?;
    server.oracle.reply_empty();

    let res = server.post("/api/ai/chat", json!({ "message": "hello" })).await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to generate response");
    Ok(())
}

#[tokio::test]
async fn missing_message_is_a_validation_error() -> Result<()> {
    let server = common::start_server().await?;

    for body in [json!({}), json!({ "message": "   " })] {
        let res = server.post("/api/ai/chat", body).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await?;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"], "message is required");
    }
    Ok(())
}
