// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, GUEST_USER_ID},
    error::AppError,
};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    /// Email of the signed-in user, used as their public id.
    pub email: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Identity of whoever is making the request.
///
/// Resolved once per request by the middleware and handed to handlers as an
/// extension; there is no process-wide "logged in" flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub authenticated: bool,
}

impl Session {
    pub fn guest() -> Self {
        Self {
            user_id: GUEST_USER_ID.to_string(),
            authenticated: false,
        }
    }
}

impl From<&Claims> for Session {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.email.clone(),
            authenticated: true,
        }
    }
}

/// Signs a new JWT for the user.
pub fn sign_jwt(
    id: i64,
    email: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: id.to_string(),
        email: email.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Bearer token from the Authorization header.
/// `Ok(None)` when the header is absent, `Err` when it is present but not a bearer token.
fn bearer_token(req: &Request<Body>) -> Result<Option<&str>, StatusCode> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(Some)
        .ok_or(StatusCode::UNAUTHORIZED)
}

/// Axum Middleware: Authentication.
///
/// Requires a valid 'Authorization: Bearer <token>' header.
/// Injects `Claims` and `Session` into the request extensions, or returns 401.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = bearer_token(&req)?.ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = verify_jwt(token, &config.jwt_secret).map_err(|_| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(Session::from(&claims));
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Axum Middleware: Optional session.
///
/// Without an Authorization header the request proceeds as the guest user.
/// A header carrying an invalid token is still rejected with 401.
pub async fn session_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let session = match bearer_token(&req)? {
        Some(token) => {
            let claims =
                verify_jwt(token, &config.jwt_secret).map_err(|_| StatusCode::UNAUTHORIZED)?;
            Session::from(&claims)
        }
        None => Session::guest(),
    };

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
