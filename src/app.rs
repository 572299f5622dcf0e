/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware pipeline の適用
 * - axum::serve() で起動し、SIGINT/SIGTERM で graceful shutdown
 */
use std::{backtrace::Backtrace, panic, sync::Arc, time::Duration};

use anyhow::Result;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    error::AppError,
    middleware::{self, Pipeline},
    repos::{
        pet_repo::PgPetRepo,
        user_repo::{PgUserRepo, UserRepository},
    },
    services::{auth::build_auth_services, pets::PetService},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,petstore_api=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    // Surface panics through tracing so they don't get lost
    // (stderr can be hidden depending on how the process is launched).
    // The recovery stage turns the panic into a 500; the server keeps running.
    panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        let backtrace = Backtrace::force_capture();

        tracing::error!(%location, %backtrace, "panic: {info}");
    }));
}

pub async fn run() -> Result<()> {
    init_tracing();
    init_panic_hook();

    let config = Config::from_env()?;
    tracing::info!("starting API in {:?} mode on {}", config.app_env, config.addr);

    let state = build_state(&config).await?;
    let app = build_router(state, &Pipeline::production());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    serve(listener, app, config.shutdown_grace).await
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepo::new(pool.clone()));
    let pets = Arc::new(PetService::new(Arc::new(PgPetRepo::new(pool))));
    let (accounts, security) = build_auth_services(config, users)?;

    if let Some(admin) = &config.admin
        && accounts
            .bootstrap_admin(&admin.name, &admin.email, &admin.password)
            .await?
    {
        tracing::info!(email = %admin.email, "admin account created");
    }

    Ok(AppState::new(
        pets,
        accounts,
        security,
        config.secure_cookies(),
    ))
}

/// `/api/v1` routes plus the fallback, wrapped by `pipeline` (outermost first).
pub fn build_router(state: AppState, pipeline: &Pipeline) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .fallback(not_found)
        .with_state(state);

    let router = middleware::http::apply(router);
    let router = middleware::security_headers::apply(router);

    pipeline.apply(router)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn serve(listener: tokio::net::TcpListener, app: Router, grace: Duration) -> Result<()> {
    let stop = Arc::new(Notify::new());

    let server = axum::serve(listener, app).with_graceful_shutdown({
        let stop = stop.clone();
        async move { stop.notified().await }
    });
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        res = &mut server => return Ok(res??),
        _ = shutdown_signal() => {}
    }

    tracing::info!(grace_seconds = grace.as_secs(), "shutting down, draining in-flight requests");
    stop.notify_one();

    match tokio::time::timeout(grace, server).await {
        Ok(res) => res??,
        Err(_) => tracing::warn!("grace period elapsed, exiting with requests in flight"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
