use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::{AppState, AuthConfig};

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
}

/// Identity of the caller, inserted into request extensions once authenticated.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i32,
}

/// Signs an HS256 token for `user_id` that expires after `auth.expiration` seconds.
///
/// The token is only accepted once a session row holds it.
pub fn issue_token(auth: &AuthConfig, user_id: i32) -> Result<String, AppError> {
    let claims = Claims {
        user_id,
        exp: Some((Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize),
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

/// HS256 with `exp` optional: tokens without it stay valid while their session lives.
fn validation() -> Validation {
    let mut validation = Validation::default();
    validation.set_required_spec_claims::<&str>(&[]);
    validation.validate_exp = true;
    validation
}

// ============================================================================
// Session Authentication Middleware
// ============================================================================

pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Extract token from Authorization header
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".to_string()))?
        .to_string();

    // 2. Decode and validate JWT
    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &validation(),
    )
    .map_err(|e| AppError::AuthenticationError(e.to_string()))?;

    // 3. A signed token is only valid while its session exists
    let session = state
        .sessions
        .find_by_token(&token)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    if session.is_none() {
        return Err(AppError::AuthenticationError("No session for token".to_string()));
    }

    // 4. Inject identity into request extensions
    req.extensions_mut().insert(AuthUser {
        user_id: token_data.claims.user_id,
    });

    Ok(next.run(req).await)
}
