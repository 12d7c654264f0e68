mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::start_server().await?;

    let res = server.get("/health").await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
    assert!(body["data"]["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::start_server().await?;

    let body: Value = server.get("/").await?.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Storefront API");
    assert!(body["data"]["endpoints"]["store"].is_string());
    Ok(())
}
