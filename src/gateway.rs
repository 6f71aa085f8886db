//! Row-level access to the application's collections (tables).
//!
//! Every collection names its columns with a [Column] enum, so the SQL built
//! here only ever contains column names chosen by the code, never by user
//! input. Values are always passed as bound parameters.

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::Error;

/// A column of a [Collection].
///
/// Implementors are field-less enums that map the application's field names
/// to the storage column names.
pub trait Column: Copy + 'static {
    /// The name of the column in the database.
    fn name(self) -> &'static str;
}

/// A named table holding records of `Self`.
pub trait Collection: Sized {
    /// The table name.
    const NAME: &'static str;

    /// The typed column names of the table.
    type Field: Column;

    /// The primary key column.
    const ID: Self::Field;

    /// Every column in the order [Collection::map_row] reads them.
    const COLUMNS: &'static [Self::Field];

    /// Create the table if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the SQL query failed.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;

    /// Convert a row holding [Collection::COLUMNS] into a record.
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into its Rust type.
    fn map_row(row: &Row) -> Result<Self, rusqlite::Error>;
}

/// A column paired with the value to store in, or compare against, it.
pub type FieldValue<F> = (F, Value);

fn column_list<C: Collection>() -> String {
    C::COLUMNS
        .iter()
        .map(|column| column.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Insert a record built from `values` and return the stored record.
///
/// # Errors
/// Returns an [Error::SqlError] if the insert failed, e.g., because a
/// required column was missing.
pub fn insert<C: Collection>(
    values: &[FieldValue<C::Field>],
    connection: &Connection,
) -> Result<C, Error> {
    let query = if values.is_empty() {
        format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING {}",
            C::NAME,
            column_list::<C>()
        )
    } else {
        let columns = values
            .iter()
            .map(|(column, _)| column.name())
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=values.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders}) RETURNING {}",
            C::NAME,
            column_list::<C>()
        )
    };

    let record = connection
        .prepare(&query)?
        .query_row(params_from_iter(values.iter().map(|(_, value)| value)), |row| {
            C::map_row(row)
        })?;

    Ok(record)
}

/// Every record in the collection, in identifier order.
///
/// # Errors
/// Returns an [Error::SqlError] if the query failed or a row could not be mapped.
pub fn select_all<C: Collection>(connection: &Connection) -> Result<Vec<C>, Error> {
    let query = format!(
        "SELECT {} FROM {} ORDER BY {} ASC",
        column_list::<C>(),
        C::NAME,
        C::ID.name()
    );

    connection
        .prepare(&query)?
        .query_map([], |row| C::map_row(row))?
        .map(|record| record.map_err(Error::from))
        .collect()
}

/// Update only the columns in `values` of the record `id` and return the
/// updated record.
///
/// # Errors
/// Returns [Error::NotFound] if there is no record with `id`, or an
/// [Error::SqlError] for any other SQL error.
pub fn update<C: Collection>(
    id: i64,
    values: &[FieldValue<C::Field>],
    connection: &Connection,
) -> Result<C, Error> {
    if values.is_empty() {
        return select_one_where::<C>(&[(C::ID, Value::Integer(id))], connection);
    }

    let assignments = values
        .iter()
        .enumerate()
        .map(|(index, (column, _))| format!("{} = ?{}", column.name(), index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let query = format!(
        "UPDATE {} SET {assignments} WHERE {} = ?{} RETURNING {}",
        C::NAME,
        C::ID.name(),
        values.len() + 1,
        column_list::<C>()
    );

    let id = Value::Integer(id);
    let params = values.iter().map(|(_, value)| value).chain(Some(&id));

    let record = connection
        .prepare(&query)?
        .query_row(params_from_iter(params), |row| C::map_row(row))?;

    Ok(record)
}

/// Delete the record `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no record with `id`, or an
/// [Error::SqlError] for any other SQL error.
pub fn delete<C: Collection>(id: i64, connection: &Connection) -> Result<(), Error> {
    let query = format!("DELETE FROM {} WHERE {} = ?1", C::NAME, C::ID.name());

    match connection.execute(&query, [id])? {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// The first record, in identifier order, where every column in
/// `predicates` equals its value.
///
/// An empty list of predicates matches every record.
///
/// # Errors
/// Returns [Error::NotFound] if no record matches, or an [Error::SqlError]
/// for any other SQL error.
pub fn select_one_where<C: Collection>(
    predicates: &[FieldValue<C::Field>],
    connection: &Connection,
) -> Result<C, Error> {
    let where_clause = if predicates.is_empty() {
        String::new()
    } else {
        let conditions = predicates
            .iter()
            .enumerate()
            .map(|(index, (column, _))| format!("{} = ?{}", column.name(), index + 1))
            .collect::<Vec<_>>()
            .join(" AND ");

        format!(" WHERE {conditions}")
    };
    let query = format!(
        "SELECT {} FROM {}{where_clause} ORDER BY {} ASC LIMIT 1",
        column_list::<C>(),
        C::NAME,
        C::ID.name()
    );

    let record = connection.prepare(&query)?.query_row(
        params_from_iter(predicates.iter().map(|(_, value)| value)),
        |row| C::map_row(row),
    )?;

    Ok(record)
}

/// The number of records in the collection.
///
/// # Errors
/// Returns an [Error::SqlError] if the query failed.
pub fn count<C: Collection>(connection: &Connection) -> Result<usize, Error> {
    let query = format!("SELECT COUNT(*) FROM {}", C::NAME);
    let count: i64 = connection.query_row(&query, [], |row| row.get(0))?;

    Ok(count.try_into().unwrap_or_default())
}
