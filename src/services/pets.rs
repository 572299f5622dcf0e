/*
 * Responsibility
 * - Catalog operations over a PetRepository
 * - Repo sentinels (NotFound) pass through unchanged as AppError
 */
use std::sync::Arc;

use tracing::info;

use crate::error::AppError;
use crate::repos::pet_repo::{Pet, PetRepository};

#[derive(Clone)]
pub struct PetService {
    repo: Arc<dyn PetRepository>,
}

impl std::fmt::Debug for PetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetService").finish_non_exhaustive()
    }
}

impl PetService {
    pub fn new(repo: Arc<dyn PetRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_pet(&self, name: &str, tag: Option<&str>) -> Result<Pet, AppError> {
        let pet = self.repo.create(name, tag).await?;
        info!(pet_id = pet.id, "pet created");
        Ok(pet)
    }

    pub async fn get_pet(&self, id: i64) -> Result<Pet, AppError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn list_pets(&self, tags: &[String], limit: Option<i32>) -> Result<Vec<Pet>, AppError> {
        Ok(self.repo.find_all(tags, limit).await?)
    }

    pub async fn delete_pet(&self, id: i64) -> Result<(), AppError> {
        self.repo.delete(id).await?;
        info!(pet_id = id, "pet deleted");
        Ok(())
    }
}
