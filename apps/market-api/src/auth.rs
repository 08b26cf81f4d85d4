//! JWT authentication module.
//!
//! The marketplace does not issue identities. Tokens are minted by the
//! external identity provider and verified here with a shared HS256
//! secret. On the first authenticated request for an unknown subject a
//! user row is auto-provisioned with the `UNASSIGNED` role; the user
//! then picks a side via `POST /patients` or `POST /stores`.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the identity provider's stable user id)
    pub sub: String,

    /// Display name, used when auto-provisioning the user row
    pub name: String,

    /// Email address, used when auto-provisioning the user row
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token verifier.
pub struct JwtManager {
    secret: String,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String) -> Self {
        JwtManager { secret }
    }

    /// Generate a token for the given identity.
    ///
    /// Production tokens come from the identity provider; this exists
    /// for local tooling and tests, which share the dev secret.
    pub fn generate_token(
        &self,
        auth_id: &str,
        name: &str,
        email: &str,
        lifetime_secs: i64,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(lifetime_secs);

        let claims = Claims {
            sub: auth_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Authentication middleware for every route except `/health`.
///
/// Verifies the bearer token, resolves (or creates) the user row for
/// its subject, and stashes the [`medimart_core::User`] in request
/// extensions for handlers to pick up.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = extract_bearer_token(header)
        .ok_or_else(|| ApiError::Unauthorized("Expected a Bearer token".to_string()))?;

    let claims = state.jwt.validate_token(token)?;

    let user = state
        .db
        .users()
        .ensure_user(&claims.sub, &claims.name, &claims.email)
        .await?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
