//! HTTP API Layer
//!
//! This crate provides the REST API for the lost and found desk using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for items, claims and the user overview
//! - **Middleware**: Authentication (supplies the acting user), audit logging
//! - **DTOs**: Request data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! Every handler passes the authenticated user explicitly to the
//! [`ResolutionCoordinator`]; nothing below this crate knows about HTTP.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(coordinator, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_claims::ResolutionCoordinator;

use crate::config::ApiConfig;
use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{items, claims, user, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ResolutionCoordinator>,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(coordinator: ResolutionCoordinator, config: ApiConfig) -> Router {
    let state = AppState {
        coordinator: Arc::new(coordinator),
        config,
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Item routes
    let item_routes = Router::new()
        .route("/found", post(items::report_found_item).get(items::list_found_items))
        .route("/found/:id", get(items::get_found_item))
        .route("/lost", post(items::report_lost_item).get(items::list_lost_items))
        .route("/lost/:id", get(items::get_lost_item))
        .route("/lost/:id/status", put(items::update_lost_item_status))
        .route("/stats/trending-categories", get(items::trending_categories));

    // Claim routes
    let claim_routes = Router::new()
        .route("/", post(claims::submit_claim).get(claims::list_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/respond", post(claims::respond_to_claim));

    // User routes
    let user_routes = Router::new()
        .route("/items", get(user::user_items));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/items", item_routes)
        .nest("/claims", claim_routes)
        .nest("/user", user_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
