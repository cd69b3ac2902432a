pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::SearchBackend;
use crate::services::candidate_service::CandidateService;
use crate::services::storage_service::{ResumeStorage, MAX_RESUME_BYTES};
use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub candidates: CandidateService,
}

impl AppState {
    /// Wires services from the global configuration.
    pub fn new(pool: SqlitePool) -> Self {
        let config = crate::config::get_config();
        Self::with(
            pool,
            ResumeStorage::new(&config.resumes_dir),
            config.search_backend,
        )
    }

    /// Explicit wiring, used by tests to inject their own storage directory
    /// and search backend.
    pub fn with(pool: SqlitePool, storage: ResumeStorage, backend: SearchBackend) -> Self {
        let search = services::search::build(backend, pool.clone());
        let candidates = CandidateService::new(pool.clone(), storage, search);
        Self { pool, candidates }
    }
}

/// The candidate API surface. Outer layers (CORS, tracing, rate limiting,
/// static resume serving) are added by the binary.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/candidates",
            get(routes::candidate_routes::list_candidates)
                .post(routes::candidate_routes::create_candidate),
        )
        .route(
            "/api/candidates-search",
            get(routes::candidate_routes::search_candidates),
        )
        .route(
            "/api/candidates-statistics",
            get(routes::candidate_routes::candidate_statistics),
        )
        .route(
            "/api/candidates/:id",
            get(routes::candidate_routes::get_candidate)
                .put(routes::candidate_routes::update_candidate)
                .delete(routes::candidate_routes::delete_candidate),
        )
        .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + 1024 * 1024))
        .with_state(state)
}
