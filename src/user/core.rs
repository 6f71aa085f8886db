//! The user record and how it is stored in the `users` table.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, Value, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    gateway::{self, Collection, Column, FieldValue},
    user::PasswordHash,
};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What a user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Administrators cannot be deleted.
    #[serde(rename = "admin")]
    Admin,
    /// A regular user.
    #[serde(rename = "user")]
    User,
}

impl Role {
    /// The value stored in the database and sent by forms.
    pub fn key(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// The label shown in the user interface.
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.key()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(FromSqlError::Other(format!("invalid role \"{other}\"").into())),
        }
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's full name.
    pub full_name: String,
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// The user's phone number.
    pub phone_number: String,
    /// What the user is allowed to do.
    pub role: Role,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// When the user was created.
    pub created_at: OffsetDateTime,
}

/// The data for a user that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The user's full name.
    pub full_name: String,
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// The user's phone number.
    pub phone_number: String,
    /// What the user is allowed to do.
    pub role: Role,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// When the user was created.
    pub created_at: OffsetDateTime,
}

/// The replacement profile of an existing user.
///
/// The password is only changed when `password_hash` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct UserChanges {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub role: Role,
    pub password_hash: Option<PasswordHash>,
}

/// The columns of the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    FullName,
    Username,
    Email,
    PhoneNumber,
    Role,
    Password,
    CreatedAt,
}

impl Column for UserField {
    fn name(self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::FullName => "nama_lengkap",
            UserField::Username => "username",
            UserField::Email => "email",
            UserField::PhoneNumber => "no_telepon",
            UserField::Role => "role",
            UserField::Password => "password",
            UserField::CreatedAt => "created_at",
        }
    }
}

impl Collection for User {
    const NAME: &'static str = "users";
    type Field = UserField;
    const ID: UserField = UserField::Id;
    const COLUMNS: &'static [UserField] = &[
        UserField::Id,
        UserField::FullName,
        UserField::Username,
        UserField::Email,
        UserField::PhoneNumber,
        UserField::Role,
        UserField::Password,
        UserField::CreatedAt,
    ];

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                nama_lengkap TEXT NOT NULL,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL,
                no_telepon TEXT NOT NULL,
                role TEXT NOT NULL,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let raw_password_hash: String = row.get(6)?;
        let raw_created_at: String = row.get(7)?;
        let created_at = OffsetDateTime::parse(&raw_created_at, &Rfc3339)
            .map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(error))
            })?;

        Ok(Self {
            id: UserID::new(row.get(0)?),
            full_name: row.get(1)?,
            username: row.get(2)?,
            email: row.get(3)?,
            phone_number: row.get(4)?,
            role: row.get(5)?,
            password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            created_at,
        })
    }
}

fn format_created_at(created_at: OffsetDateTime) -> Result<String, Error> {
    created_at
        .format(&Rfc3339)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), created_at.to_string()))
}

fn profile_values(
    full_name: &str,
    username: &str,
    email: &str,
    phone_number: &str,
    role: Role,
) -> Vec<FieldValue<UserField>> {
    vec![
        (UserField::FullName, Value::Text(full_name.to_owned())),
        (UserField::Username, Value::Text(username.to_owned())),
        (UserField::Email, Value::Text(email.to_owned())),
        (UserField::PhoneNumber, Value::Text(phone_number.to_owned())),
        (UserField::Role, Value::Text(role.key().to_owned())),
    ]
}

/// Rewrap a duplicate username error so it names the username.
fn name_duplicate(error: Error, username: &str) -> Error {
    match error {
        Error::DuplicateUsername(_) => Error::DuplicateUsername(username.to_owned()),
        error => error,
    }
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::DuplicateUsername] if the username is taken, or a
/// [Error::SqlError] if an SQL related error occurred.
pub fn create_user(user: NewUser, connection: &Connection) -> Result<User, Error> {
    let mut values = profile_values(
        &user.full_name,
        &user.username,
        &user.email,
        &user.phone_number,
        user.role,
    );
    values.push((UserField::Password, Value::Text(user.password_hash.to_string())));
    values.push((
        UserField::CreatedAt,
        Value::Text(format_created_at(user.created_at)?),
    ));

    gateway::insert(&values, connection).map_err(|error| name_duplicate(error, &user.username))
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    gateway::select_one_where(
        &[(UserField::Id, Value::Integer(user_id.as_i64()))],
        connection,
    )
}

/// Get the user that logs in with `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has the username.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    gateway::select_one_where(
        &[(UserField::Username, Value::Text(username.to_owned()))],
        connection,
    )
}

/// Every user, in the order they were created.
pub fn get_all_users(connection: &Connection) -> Result<Vec<User>, Error> {
    gateway::select_all(connection)
}

/// Replace the profile of the user `user_id`, and the password when one is given.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a user, or
/// [Error::DuplicateUsername] if the new username is taken.
pub fn update_user(
    user_id: UserID,
    changes: &UserChanges,
    connection: &Connection,
) -> Result<User, Error> {
    let mut values = profile_values(
        &changes.full_name,
        &changes.username,
        &changes.email,
        &changes.phone_number,
        changes.role,
    );

    if let Some(password_hash) = &changes.password_hash {
        values.push((UserField::Password, Value::Text(password_hash.to_string())));
    }

    gateway::update(user_id.as_i64(), &values, connection)
        .map_err(|error| name_duplicate(error, &changes.username))
}

/// Delete the user `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a user.
pub fn delete_user(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    gateway::delete::<User>(user_id.as_i64(), connection)
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    gateway::count::<User>(connection)
}
