use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::store::NewUser;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/register - Create a new user account
///
/// Expected input: `{ "name": "...", "email": "...", "password": "..." }`.
/// Email must be unused (409 otherwise); password must be at least 8 chars.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult {
    validate_register(&payload)?;

    let user = state
        .users
        .create(NewUser {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_lowercase(),
            password_hash: hash_password(&payload.password),
            access: "user".to_string(),
        })
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::created(json!({
        "message": "User created",
        "user": user_summary(&user.id, &user.name, &user.email, &user.access),
    })))
}

/// POST /auth/login - Verify credentials and issue a bearer token
///
/// The failure message is identical for unknown email and wrong password so
/// the endpoint cannot be used to probe which emails are registered.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult {
    let email = payload.email.trim().to_lowercase();

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .filter(|u| verify_password(&payload.password, &u.password_hash))
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let claims = Claims::new(user.id, user.email.clone(), user.access.clone(), user.token_version);
    let token = generate_jwt(&claims)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(ApiResponse::ok(json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": claims.expires_in(),
    })))
}

/// POST /auth/logout - Revoke every outstanding token for the requester
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult {
    state.users.bump_token_version(auth.user_id).await?;

    tracing::info!(user_id = %auth.user_id, "user logged out, tokens revoked");

    Ok(ApiResponse::ok(json!({
        "message": "You have been logged out",
    })))
}

/// GET /auth/whoami - Return the authenticated requester's profile
pub async fn whoami(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult {
    let user = state
        .users
        .find(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unknown user"))?;

    Ok(ApiResponse::ok(json!({
        "user": user_summary(&user.id, &user.name, &user.email, &user.access),
    })))
}

fn user_summary(
    id: &uuid::Uuid,
    name: &str,
    email: &str,
    access: &str,
) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "access": access,
    })
}

fn validate_register(payload: &RegisterRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if payload.name.trim().is_empty() {
        field_errors.insert("name".to_string(), "is required".to_string());
    }
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        field_errors.insert("email".to_string(), "must be a valid email address".to_string());
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        field_errors.insert(
            "password".to_string(),
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity("Validation failed", field_errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_register(&request("Alice", "alice@example.com", "longenough")).is_ok());
    }

    #[test]
    fn short_password_and_bad_email_collect_field_errors() {
        let err = validate_register(&request("", "not-an-email", "short")).unwrap_err();
        assert_eq!(err.status_code(), 422);

        let body = err.to_json();
        assert!(body["field_errors"]["name"].is_string());
        assert!(body["field_errors"]["email"].is_string());
        assert!(body["field_errors"]["password"].is_string());
    }

    #[tokio::test]
    async fn login_with_unknown_email_and_wrong_password_look_identical() {
        let state = AppState::in_memory();
        state
            .users
            .create(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: hash_password("correct-horse"),
                access: "user".to_string(),
            })
            .await
            .unwrap();

        let unknown = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "whatever12".to_string(),
            }),
        )
        .await
        .unwrap_err();

        let wrong = login(
            State(state),
            Json(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "wrong-password".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(unknown.status_code(), 401);
        assert_eq!(wrong.status_code(), 401);
        assert_eq!(unknown.message(), wrong.message());
    }
}
