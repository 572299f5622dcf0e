/// Factory: build the auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::repos::user_repo::UserRepository;
use crate::services::auth::{
    AccountService, AuthorizationPolicy, Passwords, SecurityHandler, TokenConfigError,
    TokenService,
};

pub fn build_auth_services(
    config: &Config,
    users: Arc<dyn UserRepository>,
) -> Result<(Arc<AccountService>, Arc<SecurityHandler>), TokenConfigError> {
    let tokens = Arc::new(TokenService::new(config.jwt_secret.as_bytes())?);

    let accounts = AccountService::new(users, tokens.clone(), Passwords::default());
    let security = SecurityHandler::new(tokens, AuthorizationPolicy::default());

    Ok((Arc::new(accounts), Arc::new(security)))
}
