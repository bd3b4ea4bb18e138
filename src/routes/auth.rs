use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::rngs::OsRng;
use std::env;
use uuid::Uuid;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Both register and login hand back a bearer token; the client is logged
/// in straight after registering.
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

fn mint_token(user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = env::var("JWT_SECRET").expect("JWT_SECRET missing");
    let now = Utc::now();
    let exp = now + Duration::hours(24);
    let claims = Claims {
        sub: user_id.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.len() < 8
    {
        return (StatusCode::BAD_REQUEST, "invalid payload").into_response();
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon = Argon2::default();

    let password_hash = match argon.hash_password(payload.password.as_bytes(), &salt) {
        Ok(h) => h.to_string(),
        Err(e) => {
            tracing::error!("password hash error: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "could not create user").into_response();
        }
    };
    let user_id = Uuid::new_v4();

    let res = sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&password_hash)
    .execute(&state.db)
    .await;

    match res {
        Ok(_) => match mint_token(user_id) {
            Ok(token) => (StatusCode::CREATED, Json(TokenResponse { token })).into_response(),
            Err(e) => {
                tracing::error!("jwt encode error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "token error").into_response()
            }
        },
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            (StatusCode::CONFLICT, "email already registered").into_response()
        }
        Err(e) => {
            tracing::error!("DB insert error: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "could not create user").into_response()
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let row = sqlx::query_as::<_, (Uuid, String)>(
        r#"
        SELECT id, password_hash FROM users WHERE email = $1
        "#,
    )
    .bind(&payload.email)
    .fetch_optional(&state.db)
    .await;

    let (user_id, password_hash) = match row {
        Ok(Some(r)) => r,
        Ok(None) => return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response(),
        Err(e) => {
            tracing::error!("DB error: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "db error").into_response();
        }
    };

    let parsed_hash = match PasswordHash::new(&password_hash) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("stored hash is unreadable: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "auth error").into_response();
        }
    };
    let argon = Argon2::default();
    if argon
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response();
    }

    match mint_token(user_id) {
        Ok(token) => (StatusCode::OK, Json(TokenResponse { token })).into_response(),
        Err(e) => {
            tracing::error!("jwt encode error: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "token error").into_response()
        }
    }
}
