use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

mod auth;
mod health;
mod middleware_auth;
pub mod tasks;

pub use auth::register;
pub use health::health;

use crate::routes::auth::login;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let task_router = Router::new()
        .route("/", post(tasks::routes::create).get(tasks::routes::list))
        .route(
            "/{id}",
            put(tasks::routes::update).delete(tasks::routes::delete),
        );

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .nest(
            "/api",
            Router::new()
                .nest("/tasks", task_router)
                .layer(middleware::from_fn(middleware_auth::require_auth)),
        )
}

async fn root() -> &'static str {
    "Welcome to the task API"
}
