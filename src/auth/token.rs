use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Represents the claims encoded within a JWT (JSON Web Token).
///
/// Tokens carry no expiry: once issued they stay valid for as long as the
/// signing secret does.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token, the user's unique identifier.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
}

/// Signing and verification keys derived from the process-wide secret.
///
/// Built once at start-up from `JWT_SECRET` and shared, read-only, by every worker.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtKeys(..)")
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation
}

/// Generates a signed JWT for `user_id`.
///
/// # Returns
/// Returns `AppError::InternalServerError` if encoding fails.
pub fn generate_token(keys: &JwtKeys, user_id: Uuid) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id,
        iat: chrono::Utc::now().timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
        .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a JWT string and decodes its claims.
///
/// # Returns
/// Returns `AppError::Unauthorized` if the token is empty, malformed, or its
/// signature does not match the configured secret.
pub fn verify_token(keys: &JwtKeys, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &keys.decoding, &validation())
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::from_secret(secret.as_bytes())
    }

    #[test]
    fn test_token_generation_and_verification() {
        let keys = keys("test_secret_for_gen_verify");
        let user_id = Uuid::new_v4();

        let token = generate_token(&keys, user_id).unwrap();
        let claims = verify_token(&keys, &token).unwrap();

        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_token_without_expiry_is_accepted() {
        let keys = keys("old_token_secret");
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: 0,
        };
        let old_token = encode(&Header::default(), &claims, &keys.encoding).unwrap();

        assert_eq!(verify_token(&keys, &old_token).unwrap(), claims);
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = generate_token(&keys("signing_secret"), Uuid::new_v4()).unwrap();

        match verify_token(&keys("a_completely_different_secret"), &token) {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("InvalidSignature"), "{}", msg);
            }
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_malformed_and_empty_tokens() {
        let keys = keys("secret");
        for token in ["", "not.a.jwt", "garbage"] {
            assert!(
                matches!(verify_token(&keys, token), Err(AppError::Unauthorized(_))),
                "token {:?} should be rejected",
                token
            );
        }
    }
}
