//! Balance-mutating transaction routes.
//!
//! Every endpoint returns the appended transaction record. A rejected
//! operation is not an HTTP error: the record comes back with status
//! `FAILED` and the failure code, exactly as it was logged.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use corebank_core::OperationRequest;
use corebank_shared::types::AccountId;

use crate::AppState;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/deposit", post(deposit))
        .route("/transactions/withdraw", post(withdraw))
        .route("/transactions/transfer", post(transfer))
        .route("/transactions/payment", post(payment))
}

/// Request body for single-account operations.
#[derive(Debug, Deserialize)]
pub struct SingleAccountRequest {
    /// The account to credit or debit.
    pub account_id: AccountId,
    /// Amount, must be positive.
    pub amount: Decimal,
}

/// Request body for transfers.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// The account to debit.
    pub source_account_id: AccountId,
    /// The account to credit.
    pub target_account_id: AccountId,
    /// Amount, must be positive.
    pub amount: Decimal,
}

/// POST `/transactions/deposit` - Credit an account.
async fn deposit(
    State(state): State<AppState>,
    Json(payload): Json<SingleAccountRequest>,
) -> impl IntoResponse {
    let record = state.ledger.execute(OperationRequest::Deposit {
        account_id: payload.account_id,
        amount: payload.amount,
    });
    (StatusCode::CREATED, Json(record))
}

/// POST `/transactions/withdraw` - Debit an account.
async fn withdraw(
    State(state): State<AppState>,
    Json(payload): Json<SingleAccountRequest>,
) -> impl IntoResponse {
    let record = state.ledger.execute(OperationRequest::Withdrawal {
        account_id: payload.account_id,
        amount: payload.amount,
    });
    (StatusCode::CREATED, Json(record))
}

/// POST `/transactions/transfer` - Move money between two accounts.
async fn transfer(
    State(state): State<AppState>,
    Json(payload): Json<TransferRequest>,
) -> impl IntoResponse {
    let record = state.ledger.execute(OperationRequest::Transfer {
        source_account_id: payload.source_account_id,
        target_account_id: payload.target_account_id,
        amount: payload.amount,
    });
    (StatusCode::CREATED, Json(record))
}

/// POST `/transactions/payment` - Debit an account towards an external payee.
async fn payment(
    State(state): State<AppState>,
    Json(payload): Json<SingleAccountRequest>,
) -> impl IntoResponse {
    let record = state.ledger.execute(OperationRequest::Payment {
        account_id: payload.account_id,
        amount: payload.amount,
    });
    (StatusCode::CREATED, Json(record))
}
