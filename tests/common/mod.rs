#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::{json, Value};

use tasker_api::routes::app;
use tasker_api::state::AppState;

/// A server instance running in-process on an ephemeral port, backed by the
/// in-memory stores. Each test spawns its own, so tests never share data.
pub struct TestServer {
    pub base_url: String,
}

pub async fn spawn_server() -> Result<TestServer> {
    let state = AppState::in_memory();
    let router = app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind ephemeral port")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("test server error: {}", e);
        }
    });

    Ok(TestServer { base_url: format!("http://{}", addr) })
}

/// Register a user and log them in, returning the bearer token.
pub async fn register_and_login(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    email: &str,
    password: &str,
) -> Result<String> {
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({ "name": name, "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status().as_u16() == 201, "register failed: {}", res.status());

    let res = client
        .post(format!("{}/auth/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status().as_u16() == 200, "login failed: {}", res.status());

    let body: Value = res.json().await?;
    let token = body["access_token"]
        .as_str()
        .context("login response missing access_token")?
        .to_string();
    Ok(token)
}

/// Create a task as the given user and return its JSON representation.
pub async fn create_task(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
    description: &str,
    status: &str,
) -> Result<Value> {
    let res = client
        .post(format!("{}/api/v1/tasks", base_url))
        .bearer_auth(token)
        .json(&json!({ "name": name, "description": description, "status": status }))
        .send()
        .await?;
    anyhow::ensure!(res.status().as_u16() == 201, "create task failed: {}", res.status());

    let body: Value = res.json().await?;
    Ok(body["task"].clone())
}
