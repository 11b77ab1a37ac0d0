//! HTTP API Layer
//!
//! This crate provides the REST API of the school fee ledger using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: catalog, payment, student and class endpoints
//! - **Middleware**: request ids, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: `FeeError` mapped onto HTTP statuses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(Arc::new(ledger), config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_fees::FeeLedgerService;

use crate::config::ApiConfig;
use crate::handlers::{fees, health};
use crate::middleware::{audit_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<FeeLedgerService>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `ledger` - Fee ledger wired to its stores
/// * `config` - API configuration
pub fn create_router(ledger: Arc<FeeLedgerService>, config: ApiConfig) -> Router {
    let state = AppState { ledger, config };
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let school_routes = Router::new()
        .route("/fee-types", get(fees::list_fee_types))
        .route("/payments", post(fees::record_payment))
        .route("/students/:student_id/status", get(fees::student_status))
        .route("/students/:student_id/balances", get(fees::student_balances))
        .route("/students/:student_id/history", get(fees::student_history))
        .route("/students/:student_id/statement", get(fees::student_statement))
        .route("/classes/:class_id/statistics", post(fees::class_statistics))
        .route("/classes/:class_id/report", post(fees::class_report));

    let api_routes = Router::new()
        .nest("/schools/:school_id", school_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
