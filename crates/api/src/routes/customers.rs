//! Customer-scoped routes.
//!
//! The ledger does not own the customer lifecycle. The status feed endpoint
//! mirrors identity-service events into the directory so account-opening
//! preconditions can be checked locally.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use corebank_core::CustomerStatus;
use corebank_shared::types::CustomerId;

use crate::AppState;

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers/{customer_id}/accounts", get(list_customer_accounts))
        .route("/customers/{customer_id}/block", put(block_customer))
        .route("/customers/{customer_id}/status", put(set_customer_status))
}

/// GET `/customers/{customer_id}/accounts` - List a customer's accounts.
async fn list_customer_accounts(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> impl IntoResponse {
    Json(state.ledger.customer_accounts(customer_id))
}

/// PUT `/customers/{customer_id}/block` - Block all of a customer's active
/// accounts. Already blocked, frozen, or closed accounts are untouched.
async fn block_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> impl IntoResponse {
    let blocked = state.ledger.block_customer_accounts(customer_id);
    Json(json!({
        "customer_id": customer_id,
        "blocked": blocked
    }))
}

/// Request body for the customer status feed.
#[derive(Debug, Deserialize)]
pub struct CustomerStatusRequest {
    /// New status reported by the identity service.
    pub status: CustomerStatus,
}

/// PUT `/customers/{customer_id}/status` - Record a customer status change.
async fn set_customer_status(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
    Json(payload): Json<CustomerStatusRequest>,
) -> impl IntoResponse {
    state.customers.upsert(customer_id, payload.status);
    info!(customer_id = %customer_id, status = %payload.status, "customer status recorded");
    (
        StatusCode::OK,
        Json(json!({
            "customer_id": customer_id,
            "status": payload.status
        })),
    )
}
