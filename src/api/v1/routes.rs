/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 各 route に security gate を route_layer で適用 (operation ごと)
 */
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::middleware::auth::access::secured;
use crate::services::auth::Operation;
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{get_current_user, login_user, logout_user, register_user},
    pets::{add_pet, delete_pet, find_pet_by_id, find_pets},
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/auth/register",
            secured(post(register_user), state, Operation::RegisterUser),
        )
        .route(
            "/auth/login",
            secured(post(login_user), state, Operation::LoginUser),
        )
        .route(
            "/auth/logout",
            secured(post(logout_user), state, Operation::LogoutUser),
        )
        .route(
            "/auth/me",
            secured(get(get_current_user), state, Operation::GetCurrentUser),
        )
        .route(
            "/pets",
            secured(get(find_pets), state, Operation::FindPets)
                .merge(secured(post(add_pet), state, Operation::AddPet)),
        )
        .route(
            "/pets/{id}",
            secured(get(find_pet_by_id), state, Operation::FindPetById)
                .merge(secured(delete(delete_pet), state, Operation::DeletePet)),
        )
}
