//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username and password combination did not match a user.
    ///
    /// Unknown usernames and wrong passwords are deliberately reported the
    /// same way.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// A new password is shorter than the minimum length.
    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A required form field was left blank.
    ///
    /// The string is the user facing name of the field.
    #[error("the field \"{0}\" is required")]
    MissingRequiredField(String),

    /// An income transaction was submitted without the resident's name.
    #[error("income transactions need the name of the resident who paid")]
    MissingCounterparty,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The specified username already exists in the database.
    #[error("the username \"{0}\" already exists in the database")]
    DuplicateUsername(String),

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a user that does not exist
    #[error("tried to update a user that is not in the database")]
    UpdateMissingUser,

    /// Tried to delete a user that does not exist
    #[error("tried to delete a user that is not in the database")]
    DeleteMissingUser,

    /// Tried to delete a user with the admin role.
    #[error("admin users cannot be deleted")]
    DeleteAdminUser,

    /// A report file could not be written.
    #[error("could not export the report: {0}")]
    ExportError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("users.username") =>
            {
                Error::DuplicateUsername(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Pengaturan Zona Waktu Tidak Valid",
                fix: &format!(
                    "Zona waktu \"{timezone}\" tidak dikenali. Periksa pengaturan server dan \
                    pastikan zona waktu diisi dengan nama kanonik yang valid, misalnya Asia/Jakarta."
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Pengaturan Zona Waktu Tidak Valid".to_owned(),
                    details: format!(
                        "Zona waktu \"{timezone}\" tidak dikenali. Periksa pengaturan server."
                    ),
                },
            ),
            Error::MissingRequiredField(field) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Data belum lengkap".to_owned(),
                    details: format!("Kolom {field} wajib diisi."),
                },
            ),
            Error::MissingCounterparty => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Data belum lengkap".to_owned(),
                    details: "Nama warga wajib diisi untuk transaksi pemasukan.".to_owned(),
                },
            ),
            Error::PasswordTooShort(min_length) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Password terlalu pendek".to_owned(),
                    details: format!("Password minimal {min_length} karakter."),
                },
            ),
            Error::DuplicateUsername(username) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Username sudah dipakai".to_owned(),
                    details: format!(
                        "Username \"{username}\" sudah terdaftar. Gunakan username lain."
                    ),
                },
            ),
            Error::DeleteAdminUser => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Tidak dapat menghapus pengguna".to_owned(),
                    details: "Pengguna dengan peran admin tidak dapat dihapus.".to_owned(),
                },
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Gagal memperbarui transaksi".to_owned(),
                    details: "Transaksi tidak ditemukan.".to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Gagal menghapus transaksi".to_owned(),
                    details: "Transaksi tidak ditemukan. \
                    Muat ulang halaman untuk melihat apakah transaksi sudah dihapus."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingUser => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Gagal memperbarui pengguna".to_owned(),
                    details: "Pengguna tidak ditemukan.".to_owned(),
                },
            ),
            Error::DeleteMissingUser => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Gagal menghapus pengguna".to_owned(),
                    details: "Pengguna tidak ditemukan. \
                    Muat ulang halaman untuk melihat apakah pengguna sudah dihapus."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Terjadi kesalahan".to_owned(),
                    details: "Terjadi kesalahan yang tidak terduga, periksa log server untuk detailnya."
                        .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
