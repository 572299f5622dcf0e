//! OpenAPI description of the v1 surface, served by the docs stage.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::v1::dto::{
    auth::{AuthUser, LoginRequest, RegisterRequest},
    pets::{NewPet, PetResponse},
};
use crate::error::ErrorBody;
use crate::middleware::auth::access::ACCESS_TOKEN_COOKIE;

/// Registers the `access_token` cookie as the security scheme.
struct CookieAuth;

impl Modify for CookieAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(ACCESS_TOKEN_COOKIE))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Petstore API",
        description = "Pet catalog with cookie-based JWT authentication.\n\nReads need a valid `access_token` cookie; adding and deleting pets needs the admin role."
    ),
    paths(
        crate::api::v1::handlers::auth::register_user,
        crate::api::v1::handlers::auth::login_user,
        crate::api::v1::handlers::auth::logout_user,
        crate::api::v1::handlers::auth::get_current_user,
        crate::api::v1::handlers::pets::find_pets,
        crate::api::v1::handlers::pets::add_pet,
        crate::api::v1::handlers::pets::find_pet_by_id,
        crate::api::v1::handlers::pets::delete_pet,
    ),
    components(schemas(ErrorBody, AuthUser, RegisterRequest, LoginRequest, NewPet, PetResponse)),
    modifiers(&CookieAuth),
    tags(
        (name = "auth", description = "Accounts and sessions"),
        (name = "pets", description = "Pet catalog"),
    )
)]
pub struct ApiDoc;
