// src/routes.rs

use axum::{Router, http::Method, middleware, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers::submission, state::AppState, utils::jwt::auth_middleware};

/// Assembles the main application router.
///
/// * Mounts the submission endpoints under /api/tests.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Every submission route requires a signed-in user.
    let test_routes = Router::new()
        .route(
            "/{id}/submission",
            get(submission::get_submission).post(submission::post_submission),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/tests", test_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
