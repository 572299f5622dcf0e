/*
 * Responsibility
 * - Pets の request/response DTO
 * - FindPets の query (tags は繰り返しキー: ?tags=a&tags=b)
 */
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::repos::pet_repo::Pet;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewPet {
    pub name: String,
    pub tag: Option<String>,
}

impl NewPet {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindPetsQuery {
    /// Only pets whose tag is one of these.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Maximum number of pets to return (>= 1).
    pub limit: Option<i32>,
}

impl FindPetsQuery {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(limit) = self.limit
            && limit < 1
        {
            return Err("limit must be >= 1");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PetResponse {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl From<Pet> for PetResponse {
    fn from(p: Pet) -> Self {
        Self {
            id: p.id,
            name: p.name,
            tag: p.tag,
        }
    }
}
