//! HTTP API tests driving the router in-process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use verity_nullables::NullStore;
use verity_rpc::{router, AppState, RpcMetrics};
use verity_types::VotingParams;

fn app_with_quorum(quorum: u64) -> Router {
    let store = Arc::new(NullStore::new());
    let params = VotingParams::new(quorum, 5_100).unwrap();
    let state = AppState::new(store, params).with_metrics(RpcMetrics::new().unwrap());
    router(Arc::new(state))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

async fn register(app: &Router, wallet: &str) {
    let (status, _) = call(
        app,
        Method::POST,
        "/users/register",
        Some(json!({ "uname": "reader", "walletAddress": wallet })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn publish(app: &Router, hash: &str) {
    let (status, body) = call(
        app,
        Method::POST,
        "/article/",
        Some(json!({
            "articleTitle": "Bridge reopens",
            "journalist": "0xJournalist",
            "contentHash": hash,
            "tags": ["city"],
            "refImages": ["QmImage"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Article created successfully");
}

#[tokio::test]
async fn create_and_fetch_article() {
    let app = app_with_quorum(100);
    publish(&app, "QmOne").await;

    let (status, article) = call(&app, Method::GET, "/article/QmOne", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(article["articleTitle"], "Bridge reopens");
    assert_eq!(article["refImages"], json!(["QmImage"]));
    assert_eq!(article["realVotes"], 0);

    let (status, list) = call(&app, Method::GET, "/article/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, mine) = call(&app, Method::GET, "/article/journalist/0xjournalist", None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_article_and_missing_fields_are_bad_requests() {
    let app = app_with_quorum(100);
    publish(&app, "QmDup").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/article/",
        Some(json!({ "articleTitle": "x", "journalist": "0xj", "contentHash": "QmDup" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("QmDup"));

    let (status, _) = call(&app, Method::POST, "/article/", Some(json!({ "journalist": "0xj" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_article_is_not_found() {
    let app = app_with_quorum(100);
    let (status, body) = call(&app, Method::GET, "/article/QmNope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    let (status, _) = call(&app, Method::PUT, "/article/v/QmNope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn voting_verification_and_reset_flow() {
    let app = app_with_quorum(1);
    publish(&app, "QmFlow").await;
    register(&app, "0xA").await;
    register(&app, "0xB").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/article/s/QmFlow",
        Some(json!({ "walletAddress": "0xA" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vote added as validated");
    assert_eq!(body["article"]["realVotes"], 1);
    assert_eq!(body["article"]["updated"], true);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/article/s/QmFlow",
        Some(json!({ "walletAddress": "0xa" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You already voted");

    let (_, body) = call(&app, Method::PUT, "/article/v/QmFlow", None).await;
    assert_eq!(body["message"], "Article verified as legitimate");
    assert_eq!(body["article"]["verified"], true);

    let (_, body) = call(&app, Method::PUT, "/article/reset-update/QmFlow", None).await;
    assert_eq!(body["message"], "Article update status reset successfully");
    assert_eq!(body["article"]["updated"], false);

    let (_, user) = call(
        &app,
        Method::POST,
        "/users/login",
        Some(json!({ "walletAddress": "0XA" })),
    )
    .await;
    assert_eq!(user["user"]["validatedArticles"], json!(["QmFlow"]));
}

#[tokio::test]
async fn spam_majority_deletes_then_reset_removes() {
    let app = app_with_quorum(1);
    publish(&app, "QmSpam").await;
    register(&app, "0xA").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/article/r/QmSpam",
        Some(json!({ "walletAddress": "0xA", "spamString": "QmWhy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article"]["spam"], json!(["QmWhy"]));
    assert_eq!(body["article"]["fakeVotes"], 1);

    let (_, body) = call(&app, Method::PUT, "/article/v/QmSpam", None).await;
    assert_eq!(body["message"], "Article verified was not legitimate, so deleted");
    assert_eq!(body["article"]["deleted"], true);

    let (_, body) = call(&app, Method::PUT, "/article/reset-update/QmSpam", None).await;
    assert_eq!(body["message"], "Article was deleted");
    assert_eq!(body["article"]["deleted"], true);
    assert_eq!(body["article"]["updated"], false);

    let (status, _) = call(&app, Method::GET, "/article/QmSpam", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn author_and_blank_evidence_are_refused() {
    let app = app_with_quorum(100);
    publish(&app, "QmSelf").await;
    register(&app, "0xJOURNALIST").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/article/s/QmSelf",
        Some(json!({ "walletAddress": "0xjournalist" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Reverted: you are the author");

    let (status, _) = call(
        &app,
        Method::PUT,
        "/article/r/QmSelf",
        Some(json!({ "walletAddress": "0xOther", "spamString": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unregistered_author_is_refused_as_author() {
    let app = app_with_quorum(100);
    publish(&app, "QmNoAccount").await;

    for (uri, body) in [
        ("/article/s/QmNoAccount", json!({ "walletAddress": "0xJournalist" })),
        (
            "/article/r/QmNoAccount",
            json!({ "walletAddress": "0XJOURNALIST", "spamString": "QmWhy" }),
        ),
    ] {
        let (status, body) = call(&app, Method::PUT, uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Reverted: you are the author");
    }
}

#[tokio::test]
async fn unregistered_voter_is_not_found() {
    let app = app_with_quorum(100);
    publish(&app, "QmGhost").await;
    let (status, body) = call(
        &app,
        Method::PUT,
        "/article/s/QmGhost",
        Some(json!({ "walletAddress": "0xghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("user not found"));
}

#[tokio::test]
async fn user_registration_login_and_stake() {
    let app = app_with_quorum(100);
    register(&app, "0xStaker").await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/users/register",
        Some(json!({ "uname": "again", "walletAddress": "0xstaker" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/users/update-stake",
        Some(json!({ "walletAddress": "0xStaker", "dntStake": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["dntStake"], 500);

    let (status, _) = call(
        &app,
        Method::POST,
        "/users/login",
        Some(json!({ "walletAddress": "0xunknown" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_gets_a_message() {
    let app = app_with_quorum(100);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/users/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("invalid request"));
}

#[tokio::test]
async fn running_and_metrics_endpoints() {
    let app = app_with_quorum(100);
    let (status, body) = call(&app, Method::GET, "/running", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Verity service is running");

    publish(&app, "QmCount").await;
    let (status, body) = call(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_str()
        .unwrap()
        .contains("verity_articles_created_total 1"));
}

#[tokio::test]
async fn metrics_endpoint_is_absent_when_disabled() {
    let store = Arc::new(NullStore::new());
    let app = router(Arc::new(AppState::new(store, VotingParams::default())));
    let (status, _) = call(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
