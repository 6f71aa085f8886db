use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    alert::Alert,
    user::{
        UserState,
        core::{Role, UserID, delete_user, get_user_by_id},
    },
};

/// A route handler for deleting a user, responds with an alert.
///
/// Admins cannot be deleted. The status code has to be 200 OK or htmx will
/// not delete the table row.
pub async fn delete_user_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<i64>,
) -> Response {
    let user_id = UserID::new(user_id);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match get_user_by_id(user_id, &connection) {
        Ok(user) if user.role == Role::Admin => {
            tracing::warn!("Refused to delete admin user {}", user.username);
            return Error::DeleteAdminUser.into_alert_response();
        }
        Ok(_) => {}
        Err(Error::NotFound) => return Error::DeleteMissingUser.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not get user {user_id}: {error}");
            return error.into_alert_response();
        }
    }

    match delete_user(user_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Pengguna berhasil dihapus".to_owned(),
        }
        .into_response(),
        Err(Error::NotFound) => Error::DeleteMissingUser.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete user {user_id}: {error}");
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
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        Error,
        db::initialize,
        user::{
            PasswordHash, UserState,
            core::{NewUser, Role, User, create_user, get_user_by_id},
        },
    };

    use super::delete_user_endpoint;

    fn get_test_state() -> UserState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        UserState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Asia/Jakarta".to_owned(),
            password_cost: 4,
        }
    }

    fn insert_user(state: &UserState, username: &str, role: Role) -> User {
        create_user(
            NewUser {
                full_name: username.to_owned(),
                username: username.to_owned(),
                email: format!("{username}@example.com"),
                phone_number: "0812".to_owned(),
                role,
                password_hash: PasswordHash::new_unchecked("hunter2"),
                created_at: OffsetDateTime::UNIX_EPOCH,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn can_delete_regular_user() {
        let state = get_test_state();
        let user = insert_user(&state, "budi", Role::User);

        let response = delete_user_endpoint(State(state.clone()), Path(user.id.as_i64())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_user_by_id(user.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn refuses_to_delete_admin() {
        let state = get_test_state();
        let admin = insert_user(&state, "admin", Role::Admin);

        let response = delete_user_endpoint(State(state.clone()), Path(admin.id.as_i64())).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(get_user_by_id(admin.id, &state.db_connection.lock().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn deleting_missing_user_is_not_found() {
        let response = delete_user_endpoint(State(get_test_state()), Path(99)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
