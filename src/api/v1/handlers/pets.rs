/*
 * Responsibility
 * - /pets 系 handler
 * - Path/Query/Json を extractor で受け、DTO validation → PetService 呼び出し
 * - 認可は route 側の security gate が済ませている
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::{Query, WithRejection};

use crate::{
    api::v1::dto::pets::{FindPetsQuery, NewPet, PetResponse},
    error::{AppError, ErrorBody},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/pets",
    params(FindPetsQuery),
    responses(
        (status = 200, description = "Pets in id order", body = [PetResponse]),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "pets"
)]
pub async fn find_pets(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<FindPetsQuery>, AppError>,
) -> Result<Json<Vec<PetResponse>>, AppError> {
    query.validate().map_err(AppError::bad_request)?;

    let pets = state.pets.list_pets(&query.tags, query.limit).await?;

    Ok(Json(pets.into_iter().map(PetResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/pets",
    request_body = NewPet,
    responses(
        (status = 201, description = "Pet created", body = PetResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "pets"
)]
pub async fn add_pet(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<NewPet>, AppError>,
) -> Result<(StatusCode, Json<PetResponse>), AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let pet = state
        .pets
        .create_pet(req.name.trim(), req.tag.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(pet.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/pets/{id}",
    params(("id" = i64, Path, description = "Pet id")),
    responses(
        (status = 200, description = "The pet", body = PetResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such pet", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "pets"
)]
pub async fn find_pet_by_id(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<PetResponse>, AppError> {
    let pet = state.pets.get_pet(id).await?;
    Ok(Json(pet.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/pets/{id}",
    params(("id" = i64, Path, description = "Pet id")),
    responses(
        (status = 204, description = "Pet deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "No such pet", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "pets"
)]
pub async fn delete_pet(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    state.pets.delete_pet(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
