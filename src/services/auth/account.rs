//! Registration, login and account lookup.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AppError;
use crate::repos::error::RepoError;
use crate::repos::user_repo::{User, UserRepository};
use crate::services::auth::password::Passwords;
use crate::services::auth::token::{ADMIN_ROLE, CUSTOMER_ROLE, TokenService};

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    passwords: Passwords,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        passwords: Passwords,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Create a customer account. A taken email surfaces as `Conflict`.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AppError> {
        let hash = self.hash(password).await?;
        let user = self.users.create(name, email, &hash, CUSTOMER_ROLE).await?;

        info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let user = match self.users.find_by_email(email).await {
            Ok(user) => user,
            Err(RepoError::NotFound) => {
                debug!("login rejected");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.verify(password, &user.password_hash).await? {
            debug!(user_id = user.id, "login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.create_token(user.id, &user.role)?;

        info!(user_id = user.id, "user logged in");
        Ok((token, user))
    }

    pub async fn get_user(&self, id: i64) -> Result<User, AppError> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Ensure an admin account exists for `email`. Returns `true` when one was created.
    pub async fn bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, AppError> {
        match self.users.find_by_email(email).await {
            Ok(_) => return Ok(false),
            Err(RepoError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let hash = self.hash(password).await?;
        let user = self.users.create(name, email, &hash, ADMIN_ROLE).await?;

        tracing::warn!(user_id = user.id, "bootstrapped admin account");
        Ok(true)
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash(&self, password: &str) -> Result<String, AppError> {
        let passwords = self.passwords.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| AppError::internal(format!("hashing password: {e}")))?
    }

    async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AppError> {
        let passwords = self.passwords.clone();
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        tokio::task::spawn_blocking(move || passwords.verify(&password, &stored_hash))
            .await
            .map_err(|e| AppError::internal(format!("verifying password: {e}")))
    }
}
