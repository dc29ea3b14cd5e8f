use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod booking;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;

/// Shared application state. The pool is the only shared mutable resource.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Admin: catalog ──────────────────────────────────────────────────
        .route("/admin/add_grocery", post(handlers::admin::add_grocery))
        .route("/admin/view_groceries", get(handlers::admin::view_groceries))
        .route("/admin/view_grocery/:id", get(handlers::admin::view_grocery))
        .route(
            "/admin/delete_grocery/:id",
            delete(handlers::admin::delete_grocery),
        )
        .route(
            "/admin/update_grocery/:id",
            put(handlers::admin::update_grocery),
        )
        .route(
            "/admin/manage_inventory/:id",
            put(handlers::admin::manage_inventory),
        )

        // ── User: browsing & booking ────────────────────────────────────────
        .route(
            "/user/view_available_groceries",
            get(handlers::user::view_available_groceries),
        )
        .route("/user/book_order", post(handlers::user::book_order))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
