//! End-to-end tests of the HTTP surface, driven in-process

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use livepoll::server::router;
use livepoll::BroadcastHub;

fn app() -> (Router, Arc<BroadcastHub>) {
    let hub = Arc::new(BroadcastHub::default());
    (router(Arc::clone(&hub)), hub)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn create_fruit_poll(app: &Router) -> String {
    let (status, poll) = call(
        app,
        Method::POST,
        "/api/polls",
        Some(json!({ "question": "Best fruit?", "options": ["Apple", "Banana"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    poll["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_banner() {
    let (app, _) = app();

    let (status, body) = call(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_create_and_get_poll() {
    let (app, _) = app();
    let id = create_fruit_poll(&app).await;

    let (status, poll) = call(&app, Method::GET, &format!("/api/polls/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(poll["question"], "Best fruit?");
    assert_eq!(poll["category"], "General");
    assert_eq!(poll["vote_count"], 0);
    assert_eq!(poll["like_count"], 0);
    assert_eq!(poll["dislike_count"], 0);
    assert_eq!(poll["vote_distribution"], json!({}));
    assert_eq!(poll["option_like_counts"], json!({}));
}

#[tokio::test]
async fn test_create_with_empty_options_is_rejected() {
    let (app, hub) = app();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/polls",
        Some(json!({ "question": "Nothing?", "options": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("option"));
    assert_eq!(hub.store().poll_count().await, 0);
}

#[tokio::test]
async fn test_vote_flow() {
    let (app, hub) = app();
    let id = create_fruit_poll(&app).await;
    let mut viewer = hub.subscribe().unwrap();

    let (status, receipt) = call(
        &app,
        Method::POST,
        "/api/votes",
        Some(json!({ "poll_id": id, "option_index": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["poll_id"], id.as_str());
    assert_eq!(receipt["option_index"], 0);
    assert_eq!(receipt["vote_count"], 1);
    assert_eq!(receipt["vote_distribution"]["0"], 1);

    let frame = viewer.recv().await.unwrap();
    let event: Value = serde_json::from_slice(&frame).unwrap();
    assert_eq!(event["type"], "vote_cast");
    assert_eq!(event["vote_count"], 1);

    for index in [5, -1] {
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/votes",
            Some(json!({ "poll_id": id, "option_index": index })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert!(viewer.try_recv().is_none());

    let (_, stats) = call(&app, Method::GET, &format!("/api/polls/{}/stats", id), None).await;
    assert_eq!(stats["total_votes"], 1);
    assert_eq!(stats["total_likes"], 0);
}

#[tokio::test]
async fn test_reactions() {
    let (app, _) = app();
    let id = create_fruit_poll(&app).await;

    let (status, body) = call(&app, Method::POST, "/api/likes", Some(json!({ "poll_id": id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["like_count"], 1);

    let (status, body) =
        call(&app, Method::POST, "/api/dislikes", Some(json!({ "poll_id": id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dislike_count"], 1);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/option-likes",
        Some(json!({ "poll_id": id, "option_index": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["option_index"], 1);
    assert_eq!(body["option_like_counts"]["1"], 1);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/option-likes",
        Some(json!({ "poll_id": id, "option_index": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let (app, _) = app();
    let id = create_fruit_poll(&app).await;
    let uri = format!("/api/polls/{}", id);

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["poll_id"], id.as_str());

    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::POST, "/api/likes", Some(json!({ "poll_id": id }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = call(&app, Method::GET, "/api/polls", None).await;
    assert_eq!(list["polls"], json!([]));
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let (app, _) = app();

    let (status, _) = call(&app, Method::GET, "/api/polls/not-a-poll", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/votes",
        Some(json!({ "poll_id": "not-a-poll", "option_index": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_polls_in_creation_order() {
    let (app, _) = app();
    let first = create_fruit_poll(&app).await;
    let second = create_fruit_poll(&app).await;

    let (status, list) = call(&app, Method::GET, "/api/polls", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = list["polls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
}

#[tokio::test]
async fn test_malformed_body_uses_detail_shape() {
    let (app, hub) = app();

    // Missing field
    let (status, body) =
        call(&app, Method::POST, "/api/polls", Some(json!({ "question": "Nothing?" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    // Wrong type
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/votes",
        Some(json!({ "poll_id": "x", "option_index": "first" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    // Not JSON at all
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/likes")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["detail"].is_string());

    assert_eq!(hub.store().poll_count().await, 0);
}

#[tokio::test]
async fn test_service_stats() {
    let (app, hub) = app();
    let _viewer = hub.subscribe().unwrap();
    let id = create_fruit_poll(&app).await;
    call(&app, Method::POST, "/api/likes", Some(json!({ "poll_id": id }))).await;

    let (status, stats) = call(&app, Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["polls"], 1);
    assert_eq!(stats["events_broadcast"], 2);
    assert_eq!(stats["frames_delivered"], 2);
    assert_eq!(stats["active_subscribers"], 1);
    assert_eq!(stats["fanout_ratio"], 1.0);
}
