/*
 * Responsibility
 * - /auth の request/response DTO
 * - validate(): shape checks only (uniqueness and credentials are service concerns)
 */
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repos::user_repo::User;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("password must be at least 8 characters");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        return Err("email is required");
    }
    if !email.contains('@') {
        return Err("email must contain '@'");
    }
    Ok(())
}

/// Public view of an account. The password hash never leaves the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for AuthUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
        }
    }
}
