mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn empty_listing_is_200_with_empty_array() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let token =
        common::register_and_login(&client, &server.base_url, "Alice", "alice@example.com", "longenough").await?;

    let res = client
        .get(format!("{}/api/v1/tasks", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], 200);
    assert_eq!(body["tasks"], json!([]));
    Ok(())
}

#[tokio::test]
async fn create_then_fetch_round_trips_with_assigned_owner() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let token =
        common::register_and_login(&client, &server.base_url, "Alice", "alice@example.com", "longenough").await?;

    let task = common::create_task(&client, &server.base_url, &token, "x", "y", "open").await?;
    let id = task["id"].as_str().expect("task id assigned");
    assert_eq!(task["name"], "x");
    assert_eq!(task["description"], "y");
    assert_eq!(task["status"], "open");

    let res = client
        .get(format!("{}/api/v1/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["task"]["id"], task["id"]);
    assert_eq!(body["task"]["owner_id"], task["owner_id"]);
    Ok(())
}

#[tokio::test]
async fn listing_is_scoped_to_the_requesting_owner() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let alice =
        common::register_and_login(&client, &server.base_url, "Alice", "alice@example.com", "longenough").await?;
    let bob =
        common::register_and_login(&client, &server.base_url, "Bob", "bob@example.com", "longenough").await?;

    common::create_task(&client, &server.base_url, &alice, "a1", "d", "open").await?;
    common::create_task(&client, &server.base_url, &alice, "a2", "d", "open").await?;
    common::create_task(&client, &server.base_url, &bob, "b1", "d", "open").await?;

    let res = client
        .get(format!("{}/api/v1/tasks", server.base_url))
        .bearer_auth(&alice)
        .send()
        .await?;
    let body: Value = res.json().await?;
    let names: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a1", "a2"], "creation order, own tasks only");

    let res = client
        .get(format!("{}/api/v1/tasks", server.base_url))
        .bearer_auth(&bob)
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let token =
        common::register_and_login(&client, &server.base_url, "Alice", "alice@example.com", "longenough").await?;
    let task = common::create_task(&client, &server.base_url, &token, "report", "numbers", "open").await?;
    let id = task["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/api/v1/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "status": "done" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["task"]["status"], "done");
    assert_eq!(body["task"]["name"], "report");
    assert_eq!(body["task"]["description"], "numbers");
    assert_eq!(body["task"]["owner_id"], task["owner_id"]);
    Ok(())
}

#[tokio::test]
async fn create_with_missing_fields_is_unprocessable() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let token =
        common::register_and_login(&client, &server.base_url, "Alice", "alice@example.com", "longenough").await?;

    let res = client
        .post(format!("{}/api/v1/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "", "description": "d", "status": "open" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await?;
    assert!(body["field_errors"]["name"].is_string());
    Ok(())
}

#[tokio::test]
async fn missing_id_is_404_and_foreign_task_is_403() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let alice =
        common::register_and_login(&client, &server.base_url, "Alice", "alice@example.com", "longenough").await?;
    let bob =
        common::register_and_login(&client, &server.base_url, "Bob", "bob@example.com", "longenough").await?;

    let task = common::create_task(&client, &server.base_url, &alice, "private", "d", "open").await?;
    let id = task["id"].as_str().unwrap();

    // Truly missing id -> 404
    let res = client
        .get(format!("{}/api/v1/tasks/{}", server.base_url, uuid_that_does_not_exist()))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Existing id, wrong owner -> 403, never conflated with 404
    for req in [
        client.get(format!("{}/api/v1/tasks/{}", server.base_url, id)),
        client
            .put(format!("{}/api/v1/tasks/{}", server.base_url, id))
            .json(&json!({ "status": "stolen" })),
        client.delete(format!("{}/api/v1/tasks/{}", server.base_url, id)),
    ] {
        let res = req.bearer_auth(&bob).send().await?;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Value = res.json().await?;
        assert_eq!(body["status"], 403);
    }

    // The task is unchanged after all those attempts
    let res = client
        .get(format!("{}/api/v1/tasks/{}", server.base_url, id))
        .bearer_auth(&alice)
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["task"]["status"], "open");
    Ok(())
}

#[tokio::test]
async fn delete_is_permanent_and_second_delete_is_404() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let token =
        common::register_and_login(&client, &server.base_url, "Alice", "alice@example.com", "longenough").await?;
    let task = common::create_task(&client, &server.base_url, &token, "temp", "d", "open").await?;
    let id = task["id"].as_str().unwrap();

    let res = client
        .delete(format!("{}/api/v1/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/v1/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/api/v1/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

fn uuid_that_does_not_exist() -> &'static str {
    "00000000-0000-0000-0000-00000000beef"
}
