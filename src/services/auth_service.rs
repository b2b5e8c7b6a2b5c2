use actix_web::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Environment;
use crate::utils::AppError;

pub const TOKEN_COOKIE: &str = "token";

/// Claims names owned by the issuer; client-supplied values are dropped
const RESERVED_CLAIMS: [&str; 4] = ["iat", "exp", "nbf", "jti"];

/// Trusted caller identity: the email plus whatever other claims were issued with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Identity {
    pub email: String,
    #[serde(flatten)]
    pub claims: serde_json::Map<String, serde_json::Value>,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            claims: serde_json::Map::new(),
        }
    }
}

// JWT Claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    identity: Identity,
    iat: usize,
    exp: usize,
    jti: String,
}

/// Signs and verifies session tokens with the server secret (HS256).
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// One-hour tokens, the session length used by the API
    pub fn hourly(secret: &str) -> Self {
        Self::new(secret, Duration::hours(1))
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, AppError> {
        let mut identity = identity.clone();
        for name in RESERVED_CLAIMS {
            identity.claims.remove(name);
        }

        let now = Utc::now();
        let claims = Claims {
            identity,
            iat: now.timestamp().max(0) as usize,
            exp: (now + self.ttl).timestamp().max(0) as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // `aud`/`iss`/`sub` are caller claims carried through, not checked
        validation.validate_aud = false;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims.identity)
            .map_err(|e| {
                log::debug!("Token rejected: {}", e);
                AppError::Unauthorized
            })
    }
}

/// Cookie attributes for the session token, chosen per deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            // Frontend is served from another site, so the cookie must travel cross-site
            Environment::Production => Self {
                secure: true,
                same_site: SameSite::None,
            },
            Environment::Development => Self {
                secure: false,
                same_site: SameSite::Strict,
            },
        }
    }

    fn base(&self, value: String) -> Cookie<'static> {
        Cookie::build(TOKEN_COOKIE, value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .finish()
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        self.base(token)
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base(String::new());
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify_round_trip() {
        let tokens = TokenService::hourly("test-secret");
        let mut identity = Identity::new("a@x.com");
        identity
            .claims
            .insert("name".into(), serde_json::json!("Alice"));

        let token = tokens.issue(&identity).unwrap();
        let decoded = tokens.verify(&token).unwrap();

        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(decoded.claims["name"], "Alice");
    }

    #[test]
    fn test_reserved_claims_are_not_client_controlled() {
        let tokens = TokenService::hourly("test-secret");
        let mut identity = Identity::new("a@x.com");
        identity
            .claims
            .insert("exp".into(), serde_json::json!(4_102_444_800u64));

        let token = tokens.issue(&identity).unwrap();
        let decoded = tokens.verify(&token).unwrap();
        assert!(!decoded.claims.contains_key("exp"));
    }

    #[test]
    fn test_registered_claims_are_carried_through() {
        let tokens = TokenService::hourly("test-secret");
        let mut identity = Identity::new("a@x.com");
        for (name, value) in [("aud", "electrosavvy"), ("iss", "firebase"), ("sub", "uid-42")] {
            identity.claims.insert(name.into(), serde_json::json!(value));
        }

        let token = tokens.issue(&identity).unwrap();
        let decoded = tokens.verify(&token).unwrap();
        assert_eq!(decoded.claims["aud"], "electrosavvy");
        assert_eq!(decoded.claims["iss"], "firebase");
        assert_eq!(decoded.claims["sub"], "uid-42");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = TokenService::new("test-secret", Duration::seconds(-30));
        let token = expired.issue(&Identity::new("a@x.com")).unwrap();

        let tokens = TokenService::hourly("test-secret");
        assert!(matches!(tokens.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let tokens = TokenService::hourly("test-secret");
        let token = tokens.issue(&Identity::new("a@x.com")).unwrap();

        // Swap in the payload of someone else's token, keep the original signature
        let forged_source = tokens.issue(&Identity::new("mallory@x.com")).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged_source.split('.').nth(1).unwrap();
        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert!(matches!(tokens.verify(&tampered), Err(AppError::Unauthorized)));

        let other = TokenService::hourly("another-secret");
        assert!(matches!(other.verify(&token), Err(AppError::Unauthorized)));

        assert!(matches!(tokens.verify("not.a.jwt"), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_cookie_policy_per_environment() {
        let dev = CookiePolicy::for_environment(Environment::Development);
        let cookie = dev.session_cookie("abc".into());
        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));

        let prod = CookiePolicy::for_environment(Environment::Production);
        let cookie = prod.session_cookie("abc".into());
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
    }

    #[test]
    fn test_removal_cookie_matches_attributes() {
        let prod = CookiePolicy::for_environment(Environment::Production);
        let cookie = prod.removal_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
    }
}
