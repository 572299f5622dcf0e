pub mod error;
pub mod pet_repo;
pub mod user_repo;
