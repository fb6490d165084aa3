/// Session token generation and validation
///
/// Login produces a signed bearer token (HS256) whose subject is the
/// user's email. Tokens expire 60 minutes after issuance; expiration is
/// enforced on decode.
///
/// # Example
///
/// ```
/// use metrica_shared::auth::jwt::{create_token, decode_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new("user@example.com");
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let decoded = decode_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(decoded.sub, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// How long a session token remains valid after issuance
pub const TOKEN_TTL_MINUTES: i64 = 60;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),
}

/// Claims embedded in a session token
///
/// - `sub`: subject (the user's email)
/// - `iat`: issued-at timestamp
/// - `exp`: expiration timestamp (issuance + 60 minutes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user email
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a subject, expiring [`TOKEN_TTL_MINUTES`] from now
    pub fn new(subject: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::minutes(TOKEN_TTL_MINUTES);

        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a bearer token using HS256
///
/// The secret should be at least 32 bytes and come from configuration,
/// never from source code.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token signature and expiration, returning its claims
///
/// # Errors
///
/// - `JwtError::Expired` if the expiration timestamp has passed
/// - `JwtError::ValidationError` for a bad signature or malformed token
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_expire_sixty_minutes_after_issuance() {
        let claims = Claims::new("user@example.com");

        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_MINUTES * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_decode_token() {
        let claims = Claims::new("user@example.com");
        let token = create_token(&claims, SECRET).expect("Should create token");

        let decoded = decode_token(&token, SECRET).expect("Should decode token");
        assert_eq!(decoded.sub, "user@example.com");
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let claims = Claims::new("user@example.com");
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(decode_token(&token, "a-completely-different-secret-key").is_err());
    }

    #[test]
    fn test_decode_expired_token() {
        let now = Utc::now();
        let claims = Claims {
            sub: "user@example.com".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };

        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = decode_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_token("not.a.token", SECRET),
            Err(JwtError::ValidationError(_))
        ));
    }
}
