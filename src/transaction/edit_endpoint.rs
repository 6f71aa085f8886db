//! Defines the endpoint for updating a transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error, endpoints,
    transaction::{
        TransactionState,
        core::{TransactionId, update_transaction},
        form::TransactionForm,
    },
};

/// A route handler for updating a transaction, redirects to the transactions view on success.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction = match form.validate() {
        Ok(transaction) => transaction,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction(transaction_id, &transaction, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::NotFound) => Error::UpdateMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::assert_hx_redirect,
        transaction::{
            TransactionState,
            core::{
                NewTransaction, PaymentCategory, SettlementStatus, TransactionKind,
                create_transaction, get_transaction,
            },
            form::TransactionForm,
        },
    };

    use super::edit_transaction_endpoint;

    fn get_test_state() -> TransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form() -> TransactionForm {
        TransactionForm {
            kind: TransactionKind::Income,
            payment_category: PaymentCategory::MonthlyDues,
            amount: 60_000,
            date: date!(2024 - 03 - 05),
            counterparty_name: Some("Sari".to_owned()),
            note: Some("Iuran Maret".to_owned()),
            settlement: SettlementStatus::Unsettled,
        }
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let state = get_test_state();
        let created = create_transaction(
            &NewTransaction {
                kind: TransactionKind::Income,
                payment_category: PaymentCategory::MonthlyDues,
                amount: 50_000,
                date: date!(2024 - 03 - 01),
                counterparty_name: "Sari".to_owned(),
                note: "Iuran".to_owned(),
                settlement: SettlementStatus::Settled,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response =
            edit_transaction_endpoint(State(state.clone()), Path(created.id), Form(form())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        let updated = get_transaction(created.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.amount, Some(60_000));
        assert_eq!(updated.note, "Iuran Maret");
        assert_eq!(updated.settlement, SettlementStatus::Unsettled);
    }

    #[tokio::test]
    async fn updating_missing_transaction_is_not_found() {
        let response =
            edit_transaction_endpoint(State(get_test_state()), Path(9), Form(form())).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
