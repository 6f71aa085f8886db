//! Creates the application's tables.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, Transaction, User, gateway::Collection};

/// Create every table the application needs if it does not exist yet.
///
/// The tables are created inside a single exclusive transaction, so a
/// failure leaves the database untouched.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    User::create_table(&transaction)?;
    Transaction::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
