use crate::{
    entities::user::{self, Entity as UserEntity},
    errors::ServiceError,
    AppState,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;
use rand::RngCore;
use regex::Regex;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Paths reachable without a token: login, the public order widget
/// (presets, item add, prepay), the calculators and the payment webhook.
static PUBLIC_PATHS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^/$",
        r"^/health$",
        r"^/api-docs/",
        r"^/uploads/",
        r"^/api/auth/login$",
        r"^/api/presets",
        r"^/api/orders/[0-9]+/items$",
        r"^/api/orders/[0-9]+/prepay$",
        r"^/api/webhooks/bepaid$",
        r"^/api/calculators/",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|r| r.is_match(path))
}

/// Authenticated caller, resolved from the opaque bearer token. Travels
/// through request extensions as an explicit value; handlers take it as
/// an extractor argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Admin gate used by the handlers of mutating catalog/inventory routes.
pub fn require_admin(user: &AuthUser) -> Result<(), ServiceError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden("Admin role required".to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ServiceError::Unauthorized("Unauthorized".to_string()))
    }
}

fn bearer_token(parts_headers: &http::HeaderMap) -> Option<&str> {
    parts_headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves a bearer token against users.api_token.
pub async fn resolve_token(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Option<AuthUser>, ServiceError> {
    Ok(UserEntity::find()
        .filter(user::Column::ApiToken.eq(token))
        .one(db)
        .await?
        .map(|u| AuthUser {
            id: u.id,
            name: u.name,
            role: u.role,
        }))
}

/// Token middleware for the API router. A valid token always attaches the
/// caller to the request (public handlers may use it for attribution);
/// everything off the public allowlist requires one.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let token = bearer_token(request.headers()).map(str::to_string);
    if let Some(token) = token {
        match resolve_token(&state.db, &token).await {
            Ok(Some(auth_user)) => {
                request.extensions_mut().insert(auth_user);
                return next.run(request).await;
            }
            Ok(None) => {
                if !is_public_path(&path) {
                    return ServiceError::Unauthorized("Unauthorized".to_string())
                        .into_response();
                }
            }
            Err(e) => return e.into_response(),
        }
    } else if !is_public_path(&path) {
        return ServiceError::Unauthorized("Unauthorized".to_string()).into_response();
    }

    next.run(request).await
}

/// sha256 hex digest, the shop's password hashing scheme.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a fresh opaque API token for a user account.
pub fn generate_api_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_paths_are_public() {
        assert!(is_public_path("/"));
        assert!(is_public_path("/health"));
        assert!(is_public_path("/uploads/abc.pdf"));
        assert!(is_public_path("/api/auth/login"));
        assert!(is_public_path("/api/presets"));
        assert!(is_public_path("/api/orders/12/items"));
        assert!(is_public_path("/api/orders/12/prepay"));
        assert!(is_public_path("/api/webhooks/bepaid"));
        assert!(is_public_path("/api/calculators/flyers-color"));
    }

    #[test]
    fn item_mutation_paths_are_not_public() {
        assert!(!is_public_path("/api/orders"));
        assert!(!is_public_path("/api/orders/12/items/3"));
        assert!(!is_public_path("/api/materials"));
        assert!(!is_public_path("/api/daily/2025-01-01"));
    }

    #[test]
    fn password_hash_is_sha256_hex() {
        assert_eq!(
            hash_password("admin"),
            "8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918"
        );
    }

    #[test]
    fn generated_tokens_are_unique_and_long() {
        let a = generate_api_token();
        let b = generate_api_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
