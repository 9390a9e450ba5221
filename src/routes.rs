// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{attempt, auth, leaderboard, quiz},
    state::AppState,
    utils::jwt::{auth_middleware, session_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, quizzes, attempts, leaderboard).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, quiz store, config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/{id}", get(quiz::get_quiz))
        // Guests may submit; a bearer token attributes the attempt to its user
        .merge(
            Router::new()
                .route("/{id}/submit", post(quiz::submit_quiz))
                .layer(middleware::from_fn_with_state(state.clone(), session_middleware)),
        )
        // Authoring requires a signed-in user
        .merge(
            Router::new()
                .route("/", post(quiz::create_quiz))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let attempt_routes = Router::new().route("/{id}", get(attempt::get_attempt));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/attempts", attempt_routes)
        .route("/api/leaderboard", get(leaderboard::get_leaderboard))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
