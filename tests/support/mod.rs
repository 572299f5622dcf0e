//! Shared fixtures: in-memory repositories and a fully wired router.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use argon2::Params;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use petstore_api::{
    app::build_router,
    middleware::Pipeline,
    repos::{
        error::{RepoError, RepoResult},
        pet_repo::{Pet, PetRepository},
        user_repo::{User, UserRepository},
    },
    services::{
        auth::{AccountService, AuthorizationPolicy, Passwords, SecurityHandler, TokenService},
        pets::PetService,
    },
    state::AppState,
};
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> RepoResult<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == email) {
            return Err(RepoError::Conflict);
        }
        let now = Utc::now();
        let user = User {
            id: rows.len() as i64 + 1,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: role.to_string(),
            created_at: now,
            updated_at: now,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<User> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<User> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }
}

#[derive(Default)]
pub struct MemoryPets {
    rows: Mutex<Vec<Pet>>,
    next_id: Mutex<i64>,
}

#[async_trait]
impl PetRepository for MemoryPets {
    async fn create(&self, name: &str, tag: Option<&str>) -> RepoResult<Pet> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let pet = Pet {
            id: *next_id,
            name: name.to_string(),
            tag: tag.map(str::to_string),
        };
        self.rows.lock().unwrap().push(pet.clone());
        Ok(pet)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Pet> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_all(&self, tags: &[String], limit: Option<i32>) -> RepoResult<Vec<Pet>> {
        let rows = self.rows.lock().unwrap();
        let matching = rows.iter().filter(|p| {
            tags.is_empty() || p.tag.as_ref().is_some_and(|t| tags.contains(t))
        });
        let take = limit.map_or(usize::MAX, |l| l as usize);
        Ok(matching.take(take).cloned().collect())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub tokens: Arc<TokenService>,
    pub accounts: Arc<AccountService>,
    pub pets: Arc<MemoryPets>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_pipeline(Pipeline::production())
    }

    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        let tokens = Arc::new(TokenService::new(SECRET).unwrap());
        let users: Arc<dyn UserRepository> = Arc::new(MemoryUsers::default());
        let pets = Arc::new(MemoryPets::default());

        // Cheap argon2 parameters; production defaults are far too slow for tests.
        let passwords = Passwords::with_params(Params::new(8, 1, 1, None).unwrap());
        let accounts = Arc::new(AccountService::new(users, tokens.clone(), passwords));
        let security = Arc::new(SecurityHandler::new(
            tokens.clone(),
            AuthorizationPolicy::default(),
        ));

        let state = AppState::new(
            Arc::new(PetService::new(pets.clone())),
            accounts.clone(),
            security,
            true,
        );

        Self {
            router: build_router(state, &pipeline),
            tokens,
            accounts,
            pets,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }

    pub fn token_for(&self, user_id: i64, role: &str) -> String {
        self.tokens.create_token(user_id, role).unwrap()
    }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn with_cookie(mut req: Request<Body>, token: &str) -> Request<Body> {
    req.headers_mut().insert(
        header::COOKIE,
        format!("access_token={token}").parse().unwrap(),
    );
    req
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(res: Response<Body>) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(res: Response<Body>) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The raw `Set-Cookie` header of a response.
pub fn set_cookie(res: &Response<Body>) -> String {
    res.headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Value of the `access_token` cookie carried by a `Set-Cookie` header.
pub fn cookie_value(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.trim().strip_prefix("access_token="))
        .expect("access_token cookie")
        .to_string()
}
