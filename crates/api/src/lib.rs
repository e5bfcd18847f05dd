//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for accounts, transactions, and the customer feed
//! - Request and response types
//! - Mapping from the ledger error taxonomy to HTTP responses

pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use corebank_store::{InMemoryCustomerDirectory, LedgerService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ledger service orchestrator.
    pub ledger: Arc<LedgerService>,
    /// Customer directory, fed by identity-service events.
    pub customers: Arc<InMemoryCustomerDirectory>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
