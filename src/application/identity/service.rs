//! Account service: application-layer orchestration
//!
//! Login, admin-gated registration and first-run bootstrap. HTTP
//! handlers are thin wrappers that delegate here.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    Account, DomainError, DomainResult, Identity, NewAccount, RepositoryProvider, Role,
};
use crate::infrastructure::crypto::jwt::{IssuedToken, TokenService};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: IssuedToken,
    pub account: Account,
}

/// Orchestrates all identity use-cases.
pub struct AccountService {
    repos: Arc<dyn RepositoryProvider>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
    /// Verified against when the username is unknown, so both failure
    /// paths pay for one bcrypt comparison.
    dummy_hash: String,
}

impl AccountService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        tokens: Arc<TokenService>,
        bcrypt_cost: u32,
    ) -> DomainResult<Self> {
        let dummy_hash = hash_password("not-a-real-password", bcrypt_cost)
            .map_err(|e| DomainError::Internal(format!("Invalid bcrypt cost: {}", e)))?;

        Ok(Self {
            repos,
            tokens,
            bcrypt_cost,
            dummy_hash,
        })
    }

    // ── Authentication ──────────────────────────────────────────

    /// Verify credentials and issue a session token.
    ///
    /// Unknown usernames and wrong passwords fail identically with
    /// [`DomainError::InvalidCredentials`].
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        let account = self.repos.accounts().find_by_username(username).await?;

        let Some(account) = account else {
            let _ = verify_password(password, &self.dummy_hash);
            warn!("Rejected login attempt");
            return Err(DomainError::InvalidCredentials);
        };

        let valid = verify_password(password, &account.password_hash).unwrap_or(false);
        if !valid {
            warn!("Rejected login attempt");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&account)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        info!(account_id = %account.id, role = %account.role, "Login succeeded");
        Ok(AuthResult { token, account })
    }

    // ── Registration ────────────────────────────────────────────

    /// Decide whether `caller` may register accounts right now.
    ///
    /// Returns `true` while the store is empty (bootstrap), in which case
    /// anyone may register. Otherwise the caller must be an admin.
    pub async fn authorize_registration(&self, caller: Option<&Identity>) -> DomainResult<bool> {
        if self.repos.accounts().count().await? == 0 {
            return Ok(true);
        }

        let caller = caller.ok_or(DomainError::Unauthenticated)?;
        caller.require_role(Role::Admin)?;
        Ok(false)
    }

    /// Create an account.
    ///
    /// While the store holds no account at all, the call needs no caller
    /// and the new account is always an admin. Afterwards an admin caller
    /// is required.
    pub async fn register(
        &self,
        caller: Option<&Identity>,
        username: &str,
        password: &str,
        role: Role,
    ) -> DomainResult<Account> {
        let bootstrap = self.authorize_registration(caller).await?;
        let role = if bootstrap { Role::Admin } else { role };

        validate_credentials(username, password)?;

        let account = self.create(username, password, role).await?;
        if bootstrap {
            info!(account_id = %account.id, "Bootstrap admin registered");
        } else {
            info!(account_id = %account.id, role = %account.role, "Account registered");
        }
        Ok(account)
    }

    /// Create the configured admin when the store has no accounts yet.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        password: &str,
    ) -> DomainResult<Option<Account>> {
        if self.repos.accounts().count().await? > 0 {
            return Ok(None);
        }

        validate_credentials(username, password)?;
        let account = self.create(username, password, Role::Admin).await?;
        Ok(Some(account))
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn current_account(&self, identity: &Identity) -> DomainResult<Account> {
        self.repos
            .accounts()
            .find_by_id(&identity.account_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Account", "id", &identity.account_id))
    }

    async fn create(&self, username: &str, password: &str, role: Role) -> DomainResult<Account> {
        let password_hash = hash_password(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        self.repos
            .accounts()
            .create_account(NewAccount {
                username: username.to_string(),
                password_hash,
                role,
            })
            .await
    }
}

fn validate_credentials(username: &str, password: &str) -> DomainResult<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(DomainError::Validation(format!(
            "Username must be {}-{} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        )));
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        )));
    }
    Ok(())
}
