/*
 * Responsibility
 * - Load settings from the environment (.env honoured via dotenvy)
 * - Validate them up front (missing or malformed values fail startup)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::services::auth::token::MIN_SECRET_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    /// Anything other than an explicit development setting counts as production.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("development" | "dev" | "local") => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Optional admin account created at startup when absent.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,

    pub app_env: AppEnv,
    pub jwt_secret: String,
    pub shutdown_grace: Duration,

    pub admin: Option<AdminBootstrap>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print secrets
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("shutdown_grace", &self.shutdown_grace)
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = get("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"))?,
            None => 5,
        };

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let jwt_secret = get("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let shutdown_grace = match get("SHUTDOWN_GRACE_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid("SHUTDOWN_GRACE_SECONDS"))?,
            None => Duration::from_secs(10),
        };

        // An empty ADMIN_EMAIL means no bootstrap; a set one needs a non-empty password.
        let admin = match get("ADMIN_EMAIL").filter(|v| !v.is_empty()) {
            Some(email) => {
                let password = get("ADMIN_PASSWORD")
                    .filter(|v| !v.is_empty())
                    .ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?;
                Some(AdminBootstrap {
                    name: get("ADMIN_NAME")
                        .filter(|v| !v.is_empty())
                        .unwrap_or_else(|| "Administrator".to_string()),
                    email,
                    password,
                })
            }
            None => None,
        };

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            app_env,
            jwt_secret,
            shutdown_grace,
            admin,
        })
    }

    /// `Secure` cookie attribute: on everywhere except development.
    pub fn secure_cookies(&self) -> bool {
        self.app_env.is_production()
    }
}
