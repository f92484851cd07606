//! REST surface tests against a live server.

#![allow(clippy::expect_used, clippy::panic)]

mod common;

use reqwest::StatusCode;
use serde_json::{Value, json};

use common::start_server;

#[tokio::test]
async fn banner_and_ice_config() {
    let addr = start_server().await;
    let banner: Value = reqwest::get(format!("http://{addr}/api/"))
        .await
        .expect("banner request")
        .json()
        .await
        .expect("banner JSON");
    assert_eq!(banner, json!({"message": "Random Chat API", "status": "online"}));

    let config: Value = reqwest::get(format!("http://{addr}/api/config"))
        .await
        .expect("config request")
        .json()
        .await
        .expect("config JSON");
    let servers = config
        .get("iceServers")
        .and_then(Value::as_array)
        .expect("iceServers array");
    assert!(!servers.is_empty());
}

#[tokio::test]
async fn profile_round_trip() {
    let addr = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/api/users"))
        .json(&json!({"username": "night-owl", "interests": ["films"], "age": 30}))
        .send()
        .await
        .expect("create request");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("profile JSON");
    let id = created.get("id").and_then(Value::as_str).expect("profile id");

    let resp = client
        .get(format!("http://{addr}/api/users/{id}"))
        .send()
        .await
        .expect("get request");
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = resp.json().await.expect("profile JSON");
    assert_eq!(fetched.get("username"), Some(&json!("night-owl")));
    assert_eq!(fetched.get("age"), Some(&json!(30)));
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let addr = start_server().await;
    let resp = reqwest::get(format!(
        "http://{addr}/api/users/00000000-0000-4000-8000-000000000000"
    ))
    .await
    .expect("get request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reports_are_validated() {
    let addr = start_server().await;
    let client = reqwest::Client::new();

    let ok = client
        .post(format!("http://{addr}/api/reports?reporter_id=a"))
        .json(&json!({"reported_id": "b", "reason": "abusive"}))
        .send()
        .await
        .expect("report request");
    assert_eq!(ok.status(), StatusCode::CREATED);

    let blank_target = client
        .post(format!("http://{addr}/api/reports?reporter_id=a"))
        .json(&json!({"reported_id": "", "reason": "abusive"}))
        .send()
        .await
        .expect("report request");
    assert_eq!(blank_target.status(), StatusCode::BAD_REQUEST);
}
