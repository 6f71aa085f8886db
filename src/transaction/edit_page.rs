//! Defines the route handler for the page for editing a transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner,
        rupiah_input_styles,
    },
    navigation::NavBar,
    transaction::{
        TransactionState,
        core::{Transaction, TransactionId, get_transaction},
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

fn edit_transaction_view(transaction: &Transaction) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let spinner = loading_spinner();
    let update_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let fields = transaction_form_fields(&TransactionFormDefaults {
        kind: transaction.kind,
        payment_category: transaction.payment_category,
        amount: transaction.amount,
        date: transaction.date,
        counterparty_name: &transaction.counterparty_name,
        note: &transaction.note,
        settlement: transaction.settlement,
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaksi" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (spinner) }
                    " Simpan Perubahan"
                }

                a href=(endpoints::TRANSACTIONS_VIEW)
                {
                    div class=(BUTTON_SECONDARY_STYLE) { "Batal" }
                }
            }
        }
    };

    base("Edit Transaksi", &[rupiah_input_styles()], &content)
}

/// Renders the page for editing a transaction.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
        }
    })?;

    Ok(edit_transaction_view(&transaction).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            must_get_form, parse_html_document,
        },
        transaction::{
            TransactionState,
            core::{
                NewTransaction, PaymentCategory, SettlementStatus, TransactionKind,
                create_transaction,
            },
        },
    };

    use super::get_edit_transaction_page;

    fn get_test_state() -> TransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn renders_form_with_current_values() {
        let state = get_test_state();
        let transaction = create_transaction(
            &NewTransaction {
                kind: TransactionKind::Expense,
                payment_category: PaymentCategory::PublicFacility,
                amount: 75_000,
                date: date!(2024 - 02 - 03),
                counterparty_name: String::new(),
                note: "Perbaikan lampu".to_owned(),
                settlement: SettlementStatus::Settled,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_edit_transaction_page(State(state), Path(transaction.id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::TRANSACTION, transaction.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "amount", "number", "75000");
        assert_form_input_with_value(&form, "date", "date", "2024-02-03");
        assert_form_input_with_value(&form, "note", "text", "Perbaikan lampu");
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let response = get_edit_transaction_page(State(get_test_state()), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
