mod client;
mod config;
mod error;
mod routes;
mod state;

use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = config::Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db = PgPool::connect(&std::env::var("DATABASE_URL").expect("DATABASE_URL missing"))
        .await
        .expect("Error connecting DB");

    sqlx::migrate!()
        .run(&db)
        .await
        .expect("Error running migrations");

    let state = state::AppState { db };

    // The frontend is a browser SPA on another origin.
    let app = routes::routes()
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .expect("Error binding listener");

    tracing::info!("listening on http://{}", config.addr());

    axum::serve(listener, app).await.unwrap();
}
