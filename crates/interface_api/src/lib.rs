//! HTTP API layer
//!
//! REST interface for the hospital billing system, built on Axum.
//!
//! - **Handlers**: hospitals, patients, invoices, dashboard, accounts
//! - **Middleware**: bearer-token auth, audit logging
//! - **DTOs**: request/response shapes for the web client
//! - **Error handling**: consistent `{"error": ...}` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(pool, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth as auth_handlers, dashboard, health, hospitals, invoices, patients};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(pool: PgPool, config: ApiConfig) -> Router {
    let state = AppState { pool, config };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/auth/signup", post(auth_handlers::signup))
        .route("/api/auth/login", post(auth_handlers::login));

    let hospital_routes = Router::new()
        .route("/", get(hospitals::list))
        .route("/", post(hospitals::create))
        .route("/:id", get(hospitals::get))
        .route("/:id", put(hospitals::update))
        .route("/:id", delete(hospitals::delete));

    let patient_routes = Router::new()
        .route("/", get(patients::list))
        .route("/", post(patients::create))
        .route("/eligible", get(patients::list_eligible))
        .route("/:id", get(patients::get))
        .route("/:id", put(patients::update))
        .route("/:id", delete(patients::delete));

    let invoice_routes = Router::new()
        .route("/", get(invoices::list))
        .route("/", post(invoices::create))
        .route("/next-number", get(invoices::next_number))
        .route("/:id", get(invoices::get))
        .route("/:id", put(invoices::update))
        .route("/:id", delete(invoices::delete))
        .route("/:id/payments", post(invoices::record_payment));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/:id", patch(admin::update_user))
        .route("/users/:id", delete(admin::delete_user));

    // Protected API routes
    let api_routes = Router::new()
        .route("/auth/me", get(auth_handlers::me))
        .nest("/hospitals", hospital_routes)
        .nest("/patients", patient_routes)
        .nest("/invoices", invoice_routes)
        .route("/dashboard/stats", get(dashboard::stats))
        .nest("/admin", admin_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
