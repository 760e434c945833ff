//! Session token service (JWT, HS256)
//!
//! Tokens are stateless: nothing is stored server-side and there is no
//! revocation, so the TTL is the only bound on a leaked token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Account, Identity, Role};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Claims embedded in every session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (account ID)
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn identity(&self) -> Identity {
        Identity {
            account_id: self.sub.clone(),
            username: self.username.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// A freshly signed token together with its lifetime
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
    pub claims: TokenClaims,
}

/// Issues and validates session tokens with a process-wide secret.
pub struct TokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }

    /// Sign a token for an already verified account.
    pub fn issue(&self, account: &Account) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: account.id.clone(),
            username: account.username.clone(),
            role: account.role,
            exp: (now + Duration::hours(self.config.expiration_hours)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };
        let token = self.sign(&claims)?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl_seconds(),
            claims,
        })
    }

    /// Check signature, issuer, structure and expiry.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::InvalidToken)?;

        if data.claims.is_expired() {
            return Err(TokenError::InvalidToken);
        }

        Ok(data.claims)
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding_key,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            expiration_hours: 24,
            issuer: "profile-directory".to_string(),
        }
    }

    fn account(role: Role) -> Account {
        Account {
            id: "acc-123".to_string(),
            username: "testuser".to_string(),
            password_hash: "$2b$04$unused".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let service = TokenService::new(config("test-secret"));
        let issued = service.issue(&account(Role::Admin)).unwrap();

        assert_eq!(issued.expires_in, 24 * 3600);
        let claims = service.validate(&issued.token).unwrap();
        assert_eq!(claims.sub, "acc-123");
        assert_eq!(claims.username, "testuser");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert!(claims.identity().is_admin());
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let service = TokenService::new(config("test-secret"));
        assert!(matches!(
            service.validate("invalid-token"),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_foreign_signature_is_invalid() {
        let ours = TokenService::new(config("test-secret"));
        let theirs = TokenService::new(config("other-secret"));
        let issued = theirs.issue(&account(Role::User)).unwrap();

        assert!(matches!(
            ours.validate(&issued.token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let service = TokenService::new(config("test-secret"));
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: "acc-123".into(),
            username: "testuser".into(),
            role: Role::Admin,
            exp: now - 1,
            iat: now - 3601,
            iss: "profile-directory".into(),
        };
        let token = service.sign(&claims).unwrap();

        assert!(matches!(
            service.validate(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let service = TokenService::new(config("test-secret"));
        let mut other = config("test-secret");
        other.issuer = "someone-else".into();
        let issued = TokenService::new(other).issue(&account(Role::User)).unwrap();

        assert!(service.validate(&issued.token).is_err());
    }

    #[test]
    fn test_tampered_role_is_invalid() {
        let service = TokenService::new(config("test-secret"));
        let issued = service.issue(&account(Role::User)).unwrap();
        let mut parts: Vec<String> = issued.token.split('.').map(str::to_string).collect();
        // Swap in the payload of an admin token signed with another key
        let forged = TokenService::new(config("attacker"))
            .issue(&account(Role::Admin))
            .unwrap();
        parts[1] = forged.token.split('.').nth(1).unwrap().to_string();

        assert!(service.validate(&parts.join(".")).is_err());
    }
}
