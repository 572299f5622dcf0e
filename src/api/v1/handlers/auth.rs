/*
 * Responsibility
 * - /auth 系 handler (register / login / logout / me)
 * - identity cookie (access_token) の発行と失効
 */
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::{
    CookieJar, WithRejection,
    cookie::{Cookie, SameSite},
};
use time::Duration;

use crate::{
    api::v1::{
        dto::auth::{AuthUser, LoginRequest, RegisterRequest},
        extractors::AuthCtxExtractor,
    },
    error::{AppError, ErrorBody},
    middleware::auth::access::ACCESS_TOKEN_COOKIE,
    state::AppState,
};

/// Lifetime of the identity cookie set on login.
pub const COOKIE_MAX_AGE_SECONDS: i64 = 24 * 60 * 60;

fn access_cookie(value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthUser),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn register_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<(StatusCode, Json<AuthUser>), AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let user = state
        .accounts
        .register(req.name.trim(), &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; access_token cookie set", body = AuthUser),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<(CookieJar, Json<AuthUser>), AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let (token, user) = state.accounts.login(&req.email, &req.password).await?;

    let cookie = access_cookie(
        token,
        Duration::seconds(COOKIE_MAX_AGE_SECONDS),
        state.secure_cookies,
    );

    Ok((jar.add(cookie), Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "access_token cookie cleared"),
    ),
    tag = "auth"
)]
pub async fn logout_user(State(state): State<AppState>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let cookie = access_cookie(String::new(), Duration::ZERO, state.secure_cookies);
    (StatusCode::NO_CONTENT, jar.add(cookie))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "The caller's account", body = AuthUser),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Account no longer exists", body = ErrorBody),
    ),
    security(("cookie_auth" = [])),
    tag = "auth"
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<AuthUser>, AppError> {
    let user = state.accounts.get_user(auth.user_id).await?;
    Ok(Json(user.into()))
}
