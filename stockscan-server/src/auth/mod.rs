//! Bearer token authentication module
//!
//! Provides the `AdminCaller` extractor for Axum handlers. Tokens are HS256
//! JWTs signed with `ADMIN_JWT_SECRET` and carry the caller's capabilities:
//!
//! ```json
//! { "sub": "editor@example.com", "exp": 1767225600, "capabilities": ["manage_media"] }
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use stockscan_core::Caller;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims of an admin token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Subject (operator identity)
    pub sub: String,
    /// Expiration time (validated by jsonwebtoken)
    pub exp: u64,
    /// Granted capabilities
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl From<AdminClaims> for Caller {
    fn from(claims: AdminClaims) -> Self {
        Caller::new(claims.sub, claims.capabilities)
    }
}

/// Signs and validates admin tokens with a shared HS256 secret
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Validate a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, ApiError> {
        decode::<AdminClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::auth_error("AUTH_TOKEN_EXPIRED", "JWT token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    ApiError::auth_error("AUTH_INVALID_TOKEN", "Invalid JWT signature")
                }
                _ => ApiError::auth_error(
                    "AUTH_INVALID_TOKEN",
                    format!("JWT validation failed: {}", e),
                ),
            })
    }

    /// Issue a token for `subject` valid for `ttl`.
    pub fn issue<C: Into<String>>(
        &self,
        subject: &str,
        capabilities: impl IntoIterator<Item = C>,
        ttl: Duration,
    ) -> Result<String, ApiError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ApiError::internal(format!("System clock error: {e}")))?;

        let claims = AdminClaims {
            sub: subject.to_string(),
            exp: (now + ttl).as_secs(),
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {e}")))
    }
}

/// Extract the Bearer token from the Authorization header
fn extract_bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| {
            ApiError::auth_error("AUTH_MISSING_TOKEN", "Missing Authorization header")
        })?;

    let auth_value = auth_header.to_str().map_err(|_| {
        ApiError::auth_error(
            "AUTH_INVALID_TOKEN",
            "Invalid Authorization header encoding",
        )
    })?;

    auth_value.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::auth_error(
            "AUTH_INVALID_TOKEN",
            "Authorization header must use Bearer scheme",
        )
    })
}

/// Authenticated caller of an admin route.
///
/// The extractor:
/// 1. Reads `Authorization: Bearer <token>` header
/// 2. Validates the JWT against the configured secret
/// 3. Turns the claims into a [`Caller`]
///
/// Capability checks happen in the scan controller, so a valid token without
/// `manage_media` still reaches the handler and is rejected there.
pub struct AdminCaller(pub Caller);

impl FromRequestParts<AppState> for AdminCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;

        let verifier = state.token_verifier.as_ref().ok_or_else(|| {
            ApiError::service_unavailable(
                "Admin authentication not configured (missing ADMIN_JWT_SECRET)",
            )
        })?;

        let claims = verifier.verify(token)?;
        tracing::debug!(subject = %claims.sub, "Authenticated admin caller");

        Ok(AdminCaller(claims.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use stockscan_core::MANAGE_MEDIA;

    const SECRET: &[u8] = b"test-secret-with-enough-entropy";

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/scan");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_issue_and_verify() {
        let verifier = TokenVerifier::new(SECRET);
        let token = verifier
            .issue("editor", [MANAGE_MEDIA], Duration::from_secs(300))
            .unwrap();

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub, "editor");

        let caller: Caller = claims.into();
        assert!(caller.has_capability(MANAGE_MEDIA));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenVerifier::new(b"another-secret")
            .issue("editor", [MANAGE_MEDIA], Duration::from_secs(300))
            .unwrap();

        let err = TokenVerifier::new(SECRET).verify(&token).unwrap_err();
        assert_eq!(err.error_code(), "AUTH_INVALID_TOKEN");
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = TokenVerifier::new(SECRET);
        let claims = AdminClaims {
            sub: "editor".to_string(),
            exp: 1_000,
            capabilities: vec![MANAGE_MEDIA.to_string()],
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let err = verifier.verify(&token).unwrap_err();
        assert_eq!(err.error_code(), "AUTH_TOKEN_EXPIRED");
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = TokenVerifier::new(SECRET).verify("not.a.jwt").unwrap_err();
        assert_eq!(err.error_code(), "AUTH_INVALID_TOKEN");
    }

    #[test]
    fn test_extract_bearer_token() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&parts).unwrap(), "abc.def.ghi");

        let err = extract_bearer_token(&parts_with_auth(None)).unwrap_err();
        assert_eq!(err.error_code(), "AUTH_MISSING_TOKEN");

        let err = extract_bearer_token(&parts_with_auth(Some("Basic dXNlcg=="))).unwrap_err();
        assert_eq!(err.error_code(), "AUTH_INVALID_TOKEN");
    }
}
