//! The transaction record and how it is stored in the `transactions` table.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    gateway::{self, Collection, Column, FieldValue},
    locale::humanize_key,
};

pub type TransactionId = i64;

/// Whether money came into or went out of the cash ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money paid into the ledger, usually a resident's dues.
    #[serde(rename = "pemasukan")]
    Income,
    /// Money spent by the association.
    #[serde(rename = "pengeluaran")]
    Expense,
}

impl TransactionKind {
    /// The value stored in the database and sent by forms.
    pub fn key(self) -> &'static str {
        match self {
            TransactionKind::Income => "pemasukan",
            TransactionKind::Expense => "pengeluaran",
        }
    }

    /// The variant for a stored or submitted key, if the key is known.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "pemasukan" => Some(TransactionKind::Income),
            "pengeluaran" => Some(TransactionKind::Expense),
            _ => None,
        }
    }

    /// The name shown to users.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Pemasukan",
            TransactionKind::Expense => "Pengeluaran",
        }
    }
}

/// What a transaction was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentCategory {
    /// The monthly contribution of a household.
    #[serde(rename = "iuran_bulanan")]
    MonthlyDues,
    /// Shared facilities such as security or cleaning.
    #[serde(rename = "fasilitas_umum")]
    PublicFacility,
}

impl PaymentCategory {
    /// The value stored in the database and sent by forms.
    pub fn key(self) -> &'static str {
        match self {
            PaymentCategory::MonthlyDues => "iuran_bulanan",
            PaymentCategory::PublicFacility => "fasilitas_umum",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "iuran_bulanan" => Some(PaymentCategory::MonthlyDues),
            "fasilitas_umum" => Some(PaymentCategory::PublicFacility),
            _ => None,
        }
    }

    /// The storage key as a title-cased label, e.g. "Iuran Bulanan".
    pub fn label(self) -> String {
        humanize_key(self.key())
    }
}

/// Whether a transaction has been paid in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementStatus {
    /// Paid in full.
    #[serde(rename = "lunas")]
    Settled,
    /// Still waiting for (part of) the money.
    #[serde(rename = "belum_lunas")]
    Unsettled,
}

impl SettlementStatus {
    /// The value stored in the database and sent by forms.
    pub fn key(self) -> &'static str {
        match self {
            SettlementStatus::Settled => "lunas",
            SettlementStatus::Unsettled => "belum_lunas",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "lunas" => Some(SettlementStatus::Settled),
            "belum_lunas" => Some(SettlementStatus::Unsettled),
            _ => None,
        }
    }

    pub fn label(self) -> String {
        humanize_key(self.key())
    }
}

macro_rules! impl_sql_for_key_enum {
    ($type:ty) => {
        impl ToSql for $type {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.key()))
            }
        }

        impl FromSql for $type {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let key = value.as_str()?;
                <$type>::from_key(key).ok_or_else(|| {
                    FromSqlError::Other(format!("invalid {} \"{key}\"", stringify!($type)).into())
                })
            }
        }
    };
}

impl_sql_for_key_enum!(TransactionKind);
impl_sql_for_key_enum!(PaymentCategory);
impl_sql_for_key_enum!(SettlementStatus);

/// A movement of money in the neighbourhood cash ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID assigned by the database.
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub payment_category: PaymentCategory,
    /// The amount in whole Rupiah.
    ///
    /// `None` when the stored value is not a whole, finite number.
    pub amount: Option<i64>,
    /// The day the transaction happened.
    ///
    /// `None` when the stored value is not a valid calendar date.
    pub date: Option<Date>,
    /// The resident who paid, required for income.
    pub counterparty_name: String,
    pub note: String,
    pub settlement: SettlementStatus,
}

impl Transaction {
    /// The amount, counting an unknown amount as zero.
    pub fn amount_or_zero(&self) -> i64 {
        self.amount.unwrap_or(0)
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}

/// The data for a transaction that has not been stored yet, or the
/// replacement data for an existing transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub payment_category: PaymentCategory,
    pub amount: i64,
    pub date: Date,
    pub counterparty_name: String,
    pub note: String,
    pub settlement: SettlementStatus,
}

impl NewTransaction {
    fn field_values(&self) -> Vec<FieldValue<TransactionField>> {
        vec![
            (TransactionField::Kind, Value::from(self.kind.key().to_owned())),
            (
                TransactionField::PaymentCategory,
                Value::from(self.payment_category.key().to_owned()),
            ),
            (TransactionField::Amount, Value::Integer(self.amount)),
            (TransactionField::Date, Value::Text(format_storage_date(self.date))),
            (
                TransactionField::CounterpartyName,
                Value::Text(self.counterparty_name.clone()),
            ),
            (TransactionField::Note, Value::Text(self.note.clone())),
            (
                TransactionField::Settlement,
                Value::from(self.settlement.key().to_owned()),
            ),
        ]
    }
}

/// The columns of the `transactions` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Id,
    Kind,
    PaymentCategory,
    Amount,
    Date,
    CounterpartyName,
    Note,
    Settlement,
}

impl Column for TransactionField {
    fn name(self) -> &'static str {
        match self {
            TransactionField::Id => "id",
            TransactionField::Kind => "jenis_transaksi",
            TransactionField::PaymentCategory => "tipe_pembayaran",
            TransactionField::Amount => "amount",
            TransactionField::Date => "tanggal",
            TransactionField::CounterpartyName => "nama_warga",
            TransactionField::Note => "keterangan",
            TransactionField::Settlement => "status",
        }
    }
}

const STORAGE_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

fn format_storage_date(date: Date) -> String {
    date.format(STORAGE_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Read a stored date, treating anything that is not a "YYYY-MM-DD" date as invalid.
fn read_date(value: ValueRef<'_>) -> Option<Date> {
    match value {
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|text| Date::parse(text.trim(), STORAGE_DATE_FORMAT).ok()),
        _ => None,
    }
}

/// Read a stored amount, treating anything that is not a whole, finite
/// number as unknown.
fn read_amount(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Integer(amount) => Some(amount),
        ValueRef::Real(amount) if amount.is_finite() && amount.fract() == 0.0 => {
            Some(amount as i64)
        }
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|text| text.trim().parse().ok()),
        _ => None,
    }
}

impl Collection for Transaction {
    const NAME: &'static str = "transactions";
    type Field = TransactionField;
    const ID: TransactionField = TransactionField::Id;
    const COLUMNS: &'static [TransactionField] = &[
        TransactionField::Id,
        TransactionField::Kind,
        TransactionField::PaymentCategory,
        TransactionField::Amount,
        TransactionField::Date,
        TransactionField::CounterpartyName,
        TransactionField::Note,
        TransactionField::Settlement,
    ];

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                jenis_transaksi TEXT NOT NULL,
                tipe_pembayaran TEXT NOT NULL,
                amount NUMERIC NOT NULL,
                tanggal TEXT NOT NULL,
                nama_warga TEXT NOT NULL DEFAULT '',
                keterangan TEXT NOT NULL,
                status TEXT NOT NULL
            )",
            (),
        )?;

        // Improves the dashboard and report queries that scan by date.
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transactions_tanggal ON transactions(tanggal)",
            (),
        )?;

        Ok(())
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            payment_category: row.get(2)?,
            amount: read_amount(row.get_ref(3)?),
            date: read_date(row.get_ref(4)?),
            counterparty_name: row.get(5)?,
            note: row.get(6)?,
            settlement: row.get(7)?,
        })
    }
}

/// Store a new transaction and return it with its ID.
///
/// # Errors
/// Returns an [Error::SqlError] if the insert failed.
pub fn create_transaction(
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    gateway::insert(&transaction.field_values(), connection)
}

/// Retrieve a transaction by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a transaction.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    gateway::select_one_where(&[(TransactionField::Id, Value::Integer(id))], connection)
}

/// Every transaction, in the order they were created.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    gateway::select_all(connection)
}

/// Replace the fields of the transaction `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a transaction.
pub fn update_transaction(
    id: TransactionId,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    gateway::update(id, &transaction.field_values(), connection)
}

/// Delete the transaction `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a transaction.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    gateway::delete::<Transaction>(id, connection)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{Error, db::initialize};

    use super::{
        NewTransaction, PaymentCategory, SettlementStatus, Transaction, TransactionKind,
        create_transaction, delete_transaction, get_all_transactions, get_transaction,
        update_transaction,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn new_dues(amount: i64) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Income,
            payment_category: PaymentCategory::MonthlyDues,
            amount,
            date: date!(2024 - 01 - 10),
            counterparty_name: "Budi".to_owned(),
            note: "Iuran Januari".to_owned(),
            settlement: SettlementStatus::Settled,
        }
    }

    #[test]
    fn create_returns_stored_transaction() {
        let connection = get_test_connection();

        let transaction = create_transaction(&new_dues(100_000), &connection).unwrap();

        assert_eq!(
            transaction,
            Transaction {
                id: 1,
                kind: TransactionKind::Income,
                payment_category: PaymentCategory::MonthlyDues,
                amount: Some(100_000),
                date: Some(date!(2024 - 01 - 10)),
                counterparty_name: "Budi".to_owned(),
                note: "Iuran Januari".to_owned(),
                settlement: SettlementStatus::Settled,
            }
        );
        assert_eq!(get_transaction(1, &connection), Ok(transaction));
    }

    #[test]
    fn stores_domain_values_under_storage_names() {
        let connection = get_test_connection();
        create_transaction(&new_dues(100_000), &connection).unwrap();

        let (kind, category, date, status): (String, String, String, String) = connection
            .query_row(
                "SELECT jenis_transaksi, tipe_pembayaran, tanggal, status FROM transactions",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();

        assert_eq!(kind, "pemasukan");
        assert_eq!(category, "iuran_bulanan");
        assert_eq!(date, "2024-01-10");
        assert_eq!(status, "lunas");
    }

    #[test]
    fn invalid_stored_values_read_as_placeholders() {
        let connection = get_test_connection();
        connection
            .execute(
                "INSERT INTO transactions
                    (jenis_transaksi, tipe_pembayaran, amount, tanggal, keterangan, status)
                VALUES ('pengeluaran', 'fasilitas_umum', 1500.5, 'bukan tanggal', 'Sapu', 'lunas')",
                (),
            )
            .unwrap();

        let transaction = get_transaction(1, &connection).unwrap();

        assert_eq!(transaction.amount, None);
        assert_eq!(transaction.date, None);
        assert_eq!(transaction.counterparty_name, "");
        assert_eq!(transaction.amount_or_zero(), 0);
    }

    #[test]
    fn whole_real_amount_reads_as_integer() {
        let connection = get_test_connection();
        connection
            .execute(
                "INSERT INTO transactions
                    (jenis_transaksi, tipe_pembayaran, amount, tanggal, keterangan, status)
                VALUES ('pengeluaran', 'fasilitas_umum', 25000.0, '2024-02-01', 'Lampu', 'lunas')",
                (),
            )
            .unwrap();

        assert_eq!(get_transaction(1, &connection).unwrap().amount, Some(25_000));
    }

    #[test]
    fn update_replaces_fields() {
        let connection = get_test_connection();
        let created = create_transaction(&new_dues(100_000), &connection).unwrap();
        let replacement = NewTransaction {
            amount: 120_000,
            settlement: SettlementStatus::Unsettled,
            ..new_dues(0)
        };

        let updated = update_transaction(created.id, &replacement, &connection).unwrap();

        assert_eq!(updated.amount, Some(120_000));
        assert_eq!(updated.settlement, SettlementStatus::Unsettled);
        assert_eq!(get_all_transactions(&connection), Ok(vec![updated]));
    }

    #[test]
    fn update_missing_transaction_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(
            update_transaction(7, &new_dues(1), &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_removes_transaction() {
        let connection = get_test_connection();
        let created = create_transaction(&new_dues(100_000), &connection).unwrap();

        assert_eq!(delete_transaction(created.id, &connection), Ok(()));
        assert_eq!(get_transaction(created.id, &connection), Err(Error::NotFound));
        assert_eq!(delete_transaction(created.id, &connection), Err(Error::NotFound));
    }
}
