mod support;

use axum::http::StatusCode;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::json;
use support::{
    TestApp, body_json, cookie_value, get, json_request, set_cookie, with_cookie,
};

async fn register(app: &TestApp, name: &str, email: &str, password: &str) -> serde_json::Value {
    let res = app
        .send(json_request(
            "POST",
            "/api/v1/auth/register",
            json!({"name": name, "email": email, "password": password}),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    body_json(res).await
}

#[tokio::test]
async fn register_returns_customer_without_password() {
    let app = TestApp::new();
    let user = register(&app, "Alice", "alice@example.com", "secret123").await;

    assert_eq!(user["name"], "Alice");
    assert_eq!(user["email"], "alice@example.com");
    assert_eq!(user["role"], "customer");
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_409() {
    let app = TestApp::new();
    register(&app, "Alice", "alice@example.com", "secret123").await;

    let res = app
        .send(json_request(
            "POST",
            "/api/v1/auth/register",
            json!({"name": "Other", "email": "alice@example.com", "password": "secret456"}),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(res).await, json!({"code": 409, "message": "conflict"}));
}

#[tokio::test]
async fn register_validation_is_400() {
    let app = TestApp::new();

    for body in [
        json!({"name": "", "email": "a@b.c", "password": "secret123"}),
        json!({"name": "Ann", "email": "not-an-email", "password": "secret123"}),
        json!({"name": "Ann", "email": "a@b.c", "password": "short"}),
        json!({"name": "Ann"}),
    ] {
        let res = app
            .send(json_request("POST", "/api/v1/auth/register", body.clone()))
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body_json(res).await["code"], 400);
    }
}

#[tokio::test]
async fn login_sets_cookie_carrying_the_stored_identity() {
    let app = TestApp::new();
    let user = register(&app, "Alice", "alice@example.com", "secret123").await;

    let res = app
        .send(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({"email": "alice@example.com", "password": "secret123"}),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = set_cookie(&res);
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(cookie.contains("Secure"));

    let token = cookie_value(&cookie);
    let claims = app.tokens.parse_token(&token).unwrap();
    assert_eq!(claims.user_id(), user["id"].as_i64().unwrap());
    assert_eq!(claims.role(), "customer");

    // payload fields on the wire
    let payload = token.split('.').nth(1).unwrap();
    let payload: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
    assert_eq!(payload["sub"], user["id"].to_string());
    assert_eq!(payload["role"], "customer");
    assert!(payload["exp"].as_i64().unwrap() > payload["iat"].as_i64().unwrap());

    assert_eq!(body_json(res).await, user);
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_identical() {
    let app = TestApp::new();
    register(&app, "Alice", "alice@example.com", "secret123").await;

    let wrong_password = app
        .send(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({"email": "alice@example.com", "password": "nope-nope"}),
        ))
        .await;
    let unknown_email = app
        .send(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({"email": "bob@example.com", "password": "secret123"}),
        ))
        .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong_password.headers().get("set-cookie").is_none());

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b);
    assert_eq!(a, json!({"code": 401, "message": "invalid credentials"}));
}

#[tokio::test]
async fn me_returns_the_caller() {
    let app = TestApp::new();
    register(&app, "Alice", "alice@example.com", "secret123").await;
    let (token, _) = app
        .accounts
        .login("alice@example.com", "secret123")
        .await
        .unwrap();

    let res = app.send(with_cookie(get("/api/v1/auth/me"), &token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let me = body_json(res).await;
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["role"], "customer");
}

#[tokio::test]
async fn me_without_or_with_bad_cookie_is_401() {
    let app = TestApp::new();

    let res = app.send(get("/api/v1/auth/me")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .send(with_cookie(get("/api/v1/auth/me"), "not.a.token"))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res).await,
        json!({"code": 401, "message": "invalid token"})
    );
}

#[tokio::test]
async fn me_for_a_vanished_account_is_404() {
    let app = TestApp::new();
    let token = app.token_for(999, "customer");

    let res = app.send(with_cookie(get("/api/v1/auth/me"), &token)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logout_expires_the_cookie() {
    let app = TestApp::new();

    let res = app
        .send(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/v1/auth/logout")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let cookie = set_cookie(&res);
    assert_eq!(cookie_value(&cookie), "");
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
}
