use applicant_tracker::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{cors::permissive_cors, rate_limit},
    services::storage_service::ResumeStorage,
    AppState,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool.clone());

    // File writes and row updates are not atomic; reconcile stray resume
    // files at startup and then hourly.
    {
        let storage = ResumeStorage::new(&config.resumes_dir);
        let sweep_pool = pool.clone();
        tokio::spawn(async move {
            loop {
                match storage.sweep_orphans(&sweep_pool).await {
                    Ok(0) => {}
                    Ok(n) => info!("Orphan sweep removed {} resume file(s)", n),
                    Err(e) => tracing::error!(error = ?e, "Orphan sweep failed"),
                }
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        });
    }

    info!("Serving resumes from: {}", config.resumes_dir);

    let app = applicant_tracker::api_router(app_state)
        .nest_service("/resumes", ServeDir::new(&config.resumes_dir))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::per_second(config.api_rps),
            rate_limit::rps_middleware,
        ))
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
