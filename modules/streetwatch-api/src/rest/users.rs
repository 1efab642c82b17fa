use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use streetwatch_common::{StreetWatchError, UserAccount};

use crate::auth;
use crate::rest::error_response;
use crate::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

pub async fn api_register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Response {
    match register(&state, body).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({"message": "User registered"})),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn register(state: &AppState, body: RegisterRequest) -> Result<(), StreetWatchError> {
    if body.username.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty()
    {
        return Err(StreetWatchError::Validation(
            "username, email and password are required".to_string(),
        ));
    }

    let user = UserAccount {
        id: Uuid::new_v4(),
        username: body.username.trim().to_string(),
        email: body.email.trim().to_lowercase(),
        password_hash: auth::hash_password(&body.password),
        created_at: Utc::now(),
    };

    let created = state
        .writer
        .create_user(&user)
        .await
        .map_err(|e| StreetWatchError::Store(e.to_string()))?;

    if !created {
        return Err(StreetWatchError::Validation(
            "email already registered".to_string(),
        ));
    }
    Ok(())
}

/// The returned email is the voter identifier for subsequent vote calls.
/// No session token is issued; the client stores the email.
pub async fn api_login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Response {
    match login(&state, body).await {
        Ok(email) => Json(serde_json::json!({
            "message": "Login successful",
            "userEmail": email,
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn login(state: &AppState, body: LoginRequest) -> Result<String, StreetWatchError> {
    let email = body.email.trim().to_lowercase();

    let user = state
        .reader
        .find_user(&email)
        .await
        .map_err(|e| StreetWatchError::Store(e.to_string()))?;

    match user {
        Some(user) if auth::verify_password(&body.password, &user.password_hash) => Ok(user.email),
        _ => Err(StreetWatchError::Auth("Invalid credentials".to_string())),
    }
}
