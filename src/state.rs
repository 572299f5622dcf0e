/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone is cheap (everything behind Arc)
 */
use std::sync::Arc;

use crate::services::{
    auth::{AccountService, SecurityHandler},
    pets::PetService,
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub pets: Arc<PetService>,
    pub accounts: Arc<AccountService>,
    pub security: Arc<SecurityHandler>,
    /// `Secure` attribute on the identity cookie.
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(
        pets: Arc<PetService>,
        accounts: Arc<AccountService>,
        security: Arc<SecurityHandler>,
        secure_cookies: bool,
    ) -> Self {
        Self {
            pets,
            accounts,
            security,
            secure_cookies,
        }
    }
}
