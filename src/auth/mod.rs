pub mod cookies;
pub mod password;
pub mod resolver;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

pub use resolver::{AuthFailure, AuthResolver, CustomerPrincipal, Principal, PrincipalKind, SellerPrincipal};

/// Who a token speaks for. Seller and customer identities never decode as each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Identity {
    Seller {
        user_id: Uuid,
    },
    Customer {
        customer_id: Uuid,
        store_id: Uuid,
        store_slug: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token generation failed: {0}")]
    Generation(String),
}

/// Signs and verifies HS256 tokens with the process-wide secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        let hours = i64::try_from(security.jwt_expiry_hours).unwrap_or(i64::MAX / 3600);
        Self::new(&security.jwt_secret, Duration::hours(hours))
    }

    /// Lifetime of newly issued tokens
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issue(&self, identity: Identity) -> Result<String, TokenError> {
        self.issue_until(identity, Utc::now() + self.lifetime)
    }

    /// Issue a token with an explicit expiry instant
    pub fn issue_until(&self, identity: Identity, expires_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            identity,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Check signature, structure and expiry. Never panics on malformed input.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret", Duration::hours(1))
    }

    fn customer() -> Identity {
        Identity::Customer {
            customer_id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            store_slug: "acme".to_string(),
        }
    }

    #[test]
    fn round_trips_seller_identity() {
        let user_id = Uuid::new_v4();
        let token = codec().issue(Identity::Seller { user_id }).unwrap();
        let claims = codec().verify(&token).unwrap();
        assert_eq!(claims.identity, Identity::Seller { user_id });
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn customer_claims_use_camel_case_on_the_wire() {
        let token = codec().issue(customer()).unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        let raw = decode::<serde_json::Value>(&token, &DecodingKey::from_secret(b""), &validation)
            .unwrap()
            .claims;
        assert_eq!(raw["kind"], "customer");
        assert_eq!(raw["storeSlug"], "acme");
        assert!(raw.get("storeId").is_some());
    }

    #[test]
    fn rejects_expired_tokens() {
        let token = codec()
            .issue_until(customer(), Utc::now() - Duration::minutes(5))
            .unwrap();
        assert!(matches!(codec().verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let other = TokenCodec::new("other-secret", Duration::hours(1));
        let token = other.issue(customer()).unwrap();
        assert!(matches!(codec().verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn rejects_tampered_tokens() {
        let token = codec().issue(Identity::Seller { user_id: Uuid::new_v4() }).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let forged = codec().issue(Identity::Seller { user_id: Uuid::new_v4() }).unwrap();
        parts[1] = forged.split('.').nth(1).unwrap().to_string();
        let tampered = parts.join(".");
        assert!(matches!(codec().verify(&tampered), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn malformed_input_is_an_error_not_a_panic() {
        for junk in ["", "abc", "a.b.c", "....", "Bearer xyz"] {
            assert!(matches!(codec().verify(junk), Err(TokenError::Invalid(_))));
        }
    }
}
