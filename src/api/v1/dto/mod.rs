pub mod auth;
pub mod pets;
