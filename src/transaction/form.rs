//! The form shared by the create and edit transaction pages, and the
//! validation of what it submits.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::{NewTransaction, PaymentCategory, SettlementStatus, TransactionKind},
};

/// The form data for creating or updating a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    pub kind: TransactionKind,
    pub payment_category: PaymentCategory,
    /// The amount in whole Rupiah.
    pub amount: u64,
    pub date: Date,
    /// The resident who paid, required for income.
    #[serde(default)]
    pub counterparty_name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub settlement: SettlementStatus,
}

impl TransactionForm {
    /// Check the required fields and convert the form into a [NewTransaction].
    ///
    /// # Errors
    /// Returns [Error::MissingRequiredField] if the note is blank, or
    /// [Error::MissingCounterparty] for income without the resident's name.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let note = self.note.unwrap_or_default().trim().to_owned();
        let counterparty_name = self.counterparty_name.unwrap_or_default().trim().to_owned();

        if note.is_empty() {
            return Err(Error::MissingRequiredField("Keterangan".to_owned()));
        }

        if self.kind == TransactionKind::Income && counterparty_name.is_empty() {
            return Err(Error::MissingCounterparty);
        }

        Ok(NewTransaction {
            kind: self.kind,
            payment_category: self.payment_category,
            amount: i64::try_from(self.amount).unwrap_or(i64::MAX),
            date: self.date,
            counterparty_name,
            note,
            settlement: self.settlement,
        })
    }
}

pub struct TransactionFormDefaults<'a> {
    pub kind: TransactionKind,
    pub payment_category: PaymentCategory,
    pub amount: Option<i64>,
    pub date: Option<Date>,
    pub counterparty_name: &'a str,
    pub note: &'a str,
    pub settlement: SettlementStatus,
}

impl TransactionFormDefaults<'_> {
    /// The defaults for recording a new transaction of `kind` on `date`.
    pub fn new(kind: TransactionKind, date: Date) -> Self {
        Self {
            kind,
            payment_category: PaymentCategory::MonthlyDues,
            amount: None,
            date: Some(date),
            counterparty_name: "",
            note: "",
            settlement: SettlementStatus::Settled,
        }
    }
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let kinds = [TransactionKind::Income, TransactionKind::Expense];
    let categories = [PaymentCategory::MonthlyDues, PaymentCategory::PublicFacility];
    let statuses = [SettlementStatus::Settled, SettlementStatus::Unsettled];

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Jenis Transaksi" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for kind in kinds {
                    @let id = format!("kind-{}", kind.key());

                    div class="flex items-center gap-3"
                    {
                        input
                            name="kind"
                            id=(id)
                            type="radio"
                            value=(kind.key())
                            checked[kind == defaults.kind]
                            required
                            tabindex="0"
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (kind.label()) }
                    }
                }
            }
        }

        div
        {
            label for="payment_category" class=(FORM_LABEL_STYLE) { "Tipe Pembayaran" }

            select
                name="payment_category"
                id="payment_category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in categories {
                    option
                        value=(category.key())
                        selected[category == defaults.payment_category]
                    {
                        (category.label())
                    }
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Jumlah" }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="1"
                    min="0"
                    placeholder="0"
                    required
                    value=[defaults.amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Tanggal" }

            input
                name="date"
                id="date"
                type="date"
                value=[defaults.date]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="counterparty_name" class=(FORM_LABEL_STYLE)
            {
                "Nama Warga"
                span class="font-normal text-gray-500 dark:text-gray-400"
                {
                    " (wajib untuk pemasukan)"
                }
            }

            input
                name="counterparty_name"
                id="counterparty_name"
                type="text"
                placeholder="Nama warga yang membayar"
                value=(defaults.counterparty_name)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="note" class=(FORM_LABEL_STYLE) { "Keterangan" }

            input
                name="note"
                id="note"
                type="text"
                placeholder="Contoh: Iuran bulan Januari"
                value=(defaults.note)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="settlement" class=(FORM_LABEL_STYLE) { "Status" }

            select
                name="settlement"
                id="settlement"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for status in statuses {
                    option
                        value=(status.key())
                        selected[status == defaults.settlement]
                    {
                        (status.label())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        Error,
        transaction::core::{PaymentCategory, SettlementStatus, TransactionKind},
    };

    use super::{TransactionForm, TransactionFormDefaults, transaction_form_fields};

    fn dues_form() -> TransactionForm {
        TransactionForm {
            kind: TransactionKind::Income,
            payment_category: PaymentCategory::MonthlyDues,
            amount: 50_000,
            date: date!(2024 - 01 - 10),
            counterparty_name: Some(" Budi ".to_owned()),
            note: Some("Iuran Januari".to_owned()),
            settlement: SettlementStatus::Settled,
        }
    }

    #[test]
    fn valid_form_is_trimmed() {
        let transaction = dues_form().validate().unwrap();

        assert_eq!(transaction.counterparty_name, "Budi");
        assert_eq!(transaction.amount, 50_000);
    }

    #[test]
    fn note_is_required() {
        let form = TransactionForm {
            note: Some("   ".to_owned()),
            ..dues_form()
        };

        assert_eq!(
            form.validate(),
            Err(Error::MissingRequiredField("Keterangan".to_owned()))
        );
    }

    #[test]
    fn income_needs_counterparty() {
        let form = TransactionForm {
            counterparty_name: None,
            ..dues_form()
        };

        assert_eq!(form.validate(), Err(Error::MissingCounterparty));
    }

    #[test]
    fn expense_does_not_need_counterparty() {
        let form = TransactionForm {
            kind: TransactionKind::Expense,
            counterparty_name: None,
            ..dues_form()
        };

        let transaction = form.validate().unwrap();

        assert_eq!(transaction.counterparty_name, "");
    }

    #[test]
    fn form_fields_check_selected_kind() {
        for (kind, want) in [
            (TransactionKind::Income, "pemasukan"),
            (TransactionKind::Expense, "pengeluaran"),
        ] {
            let fields =
                transaction_form_fields(&TransactionFormDefaults::new(kind, date!(2024 - 01 - 10)));
            let document =
                Html::parse_fragment(&maud::html! { form { (fields) } }.into_string());

            let selector = Selector::parse("input[type=radio][name=kind]").unwrap();
            let inputs = document.select(&selector).collect::<Vec<_>>();
            assert_eq!(inputs.len(), 2, "want 2 kind inputs, got {}", inputs.len());

            let checked = inputs
                .iter()
                .find(|input| input.value().attr("checked").is_some())
                .and_then(|input| input.value().attr("value"));
            assert_eq!(checked, Some(want));
        }
    }
}
