//! Account lifecycle and query routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use tracing::info;

use corebank_core::AccountType;
use corebank_shared::types::{AccountId, Currency, CustomerId, PageRequest};

use crate::AppState;
use crate::routes::error_response;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(open_account))
        .route("/accounts", get(list_accounts))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}/freeze", put(freeze_account))
        .route("/accounts/{account_id}/block", put(block_account))
        .route("/accounts/{account_id}/activate", put(activate_account))
        .route("/accounts/{account_id}/close", put(close_account))
        .route("/accounts/{account_id}/transactions", get(list_transactions))
}

/// Request body for opening an account.
#[derive(Debug, Deserialize)]
pub struct OpenAccountRequest {
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Account type: CURRENT or SAVINGS.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Account currency: EUR, XOF or USD.
    pub currency: Currency,
}

/// POST `/accounts` - Open an account for a customer.
async fn open_account(
    State(state): State<AppState>,
    Json(payload): Json<OpenAccountRequest>,
) -> impl IntoResponse {
    match state
        .ledger
        .open_account(payload.customer_id, payload.account_type, payload.currency)
    {
        Ok(account) => {
            info!(account_id = %account.id, customer_id = %account.customer_id, "account opened via API");
            (StatusCode::CREATED, Json(account)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/accounts` - List all accounts, oldest first.
async fn list_accounts(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.ledger.accounts())
}

/// GET `/accounts/{account_id}` - Get one account.
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> impl IntoResponse {
    match state.ledger.account(account_id) {
        Ok(account) => Json(account).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/accounts/{account_id}/freeze` - Freeze an active account.
async fn freeze_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> impl IntoResponse {
    match state.ledger.freeze(account_id) {
        Ok(account) => Json(account).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/accounts/{account_id}/block` - Block an active account.
async fn block_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> impl IntoResponse {
    match state.ledger.block(account_id) {
        Ok(account) => Json(account).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/accounts/{account_id}/activate` - Reactivate a frozen or blocked account.
async fn activate_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> impl IntoResponse {
    match state.ledger.activate(account_id) {
        Ok(account) => Json(account).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/accounts/{account_id}/close` - Close an account with zero balance.
async fn close_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> impl IntoResponse {
    match state.ledger.close(account_id) {
        Ok(account) => Json(account).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/accounts/{account_id}/transactions` - Paged transaction history, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    match state.ledger.transactions(account_id, page) {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&e),
    }
}
