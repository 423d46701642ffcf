//! Route definitions for pgconsole.
//!
//! `/login` is public; every other route sits behind the auth gate.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes, the auth gate, and request logging.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(session_routes())
        .merge(browse_routes())
        .merge(data_routes())
        .merge(query_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_gate,
        ));

    Router::new()
        .merge(public_routes())
        .merge(protected)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Login form and submission
fn public_routes() -> Router<AppState> {
    Router::new().route(
        "/login",
        get(handlers::auth::login_page).post(handlers::auth::login),
    )
}

/// Logout and session metadata
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/session-status", get(handlers::session::session_status))
}

/// Dashboard, table list, schema, database metadata, health
fn browse_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::dashboard::dashboard))
        .route("/tables", get(handlers::tables::list_tables))
        .route("/schema/{table}", get(handlers::tables::table_schema))
        .route("/database-info", get(handlers::dashboard::database_info))
        .route("/health", get(handlers::health::health))
}

/// Row CRUD and export
fn data_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/data/{table}",
            get(handlers::data::list_rows).post(handlers::data::insert_row),
        )
        .route(
            "/data/{table}/{id}",
            axum::routing::put(handlers::data::update_row).delete(handlers::data::delete_row),
        )
        .route("/export/{table}", get(handlers::export::export_table))
}

/// Ad-hoc SQL
fn query_routes() -> Router<AppState> {
    Router::new().route("/run-query", post(handlers::query::run_query))
}
