pub mod account;
pub mod factory;
pub mod password;
pub mod policy;
pub mod security;
pub mod token;

pub use account::AccountService;
pub use factory::build_auth_services;
pub use password::Passwords;
pub use policy::{AuthorizationPolicy, Operation};
pub use security::SecurityHandler;
pub use token::{Claims, Clock, InvalidToken, SystemClock, TokenConfigError, TokenService};
