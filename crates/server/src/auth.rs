//! Caller identity, taken from the identity provider's bearer token.
//!
//! Sign-in itself is delegated to the hosted identity provider; the server
//! only verifies the HS256 signature and reads the subject claim.

use axum::http::header::AUTHORIZATION;
use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Uuid,
}

/// Authenticated user id extracted from the Authorization header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

        let key = DecodingKey::from_secret(state.config.jwt_secret.as_bytes());
        let data = decode::<Claims>(token, &key, &Validation::default())
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthUser(data.claims.sub))
    }
}
