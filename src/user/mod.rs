//! User management: the user model, password hashing, and the pages and
//! endpoints for listing, creating, editing and deleting users.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod password;
mod users_page;

pub use core::{NewUser, Role, User, UserID, count_users, create_user, get_user_by_username};
pub use create_endpoint::create_user_endpoint;
pub use create_page::get_create_user_page;
pub use delete_endpoint::delete_user_endpoint;
pub use edit_endpoint::edit_user_endpoint;
pub use edit_page::get_edit_user_page;
pub use password::{PasswordHash, ValidatedPassword};
pub use users_page::get_users_page;

/// The state needed by the user pages and endpoints.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
    /// The bcrypt cost used to hash new passwords.
    pub password_cost: u32,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            password_cost: PasswordHash::DEFAULT_COST,
        }
    }
}
