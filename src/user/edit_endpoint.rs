//! Defines the endpoint for updating a user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error, endpoints,
    user::{
        UserState,
        core::{UserID, update_user},
        form::UserForm,
    },
};

/// A route handler for updating a user, redirects to the users view on success.
///
/// A blank password keeps the user's current password.
pub async fn edit_user_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<i64>,
    Form(form): Form<UserForm>,
) -> Response {
    let changes = match form.validate_edit(state.password_cost) {
        Ok(changes) => changes,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_user(UserID::new(user_id), &changes, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::USERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::NotFound) => Error::UpdateMissingUser.into_alert_response(),
        Err(error @ Error::DuplicateUsername(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("could not update user {user_id}: {error}");
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
    use time::OffsetDateTime;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::assert_hx_redirect,
        user::{
            PasswordHash, UserState,
            core::{NewUser, Role, User, create_user, get_user_by_id},
            form::UserForm,
        },
    };

    use super::edit_user_endpoint;

    fn get_test_state() -> UserState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        UserState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Asia/Jakarta".to_owned(),
            password_cost: 4,
        }
    }

    fn insert_user(state: &UserState, username: &str) -> User {
        create_user(
            NewUser {
                full_name: "Budi Santoso".to_owned(),
                username: username.to_owned(),
                email: "budi@example.com".to_owned(),
                phone_number: "0812".to_owned(),
                role: Role::User,
                password_hash: PasswordHash::from_raw_password("rahasia", 4).unwrap(),
                created_at: OffsetDateTime::UNIX_EPOCH,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap()
    }

    fn form(username: &str, password: Option<&str>) -> UserForm {
        UserForm {
            full_name: Some("Budi S.".to_owned()),
            username: Some(username.to_owned()),
            email: Some("budi@warga.id".to_owned()),
            phone_number: Some("0899".to_owned()),
            role: Role::User,
            password: password.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn blank_password_keeps_current_password() {
        let state = get_test_state();
        let user = insert_user(&state, "budi");

        let response = edit_user_endpoint(
            State(state.clone()),
            Path(user.id.as_i64()),
            Form(form("budi", None)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::USERS_VIEW);
        let updated = get_user_by_id(user.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.full_name, "Budi S.");
        assert_eq!(updated.email, "budi@warga.id");
        assert!(updated.password_hash.verify("rahasia").unwrap());
    }

    #[tokio::test]
    async fn new_password_replaces_current_password() {
        let state = get_test_state();
        let user = insert_user(&state, "budi");

        edit_user_endpoint(
            State(state.clone()),
            Path(user.id.as_i64()),
            Form(form("budi", Some("baru"))),
        )
        .await;

        let updated = get_user_by_id(user.id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(updated.password_hash.verify("baru").unwrap());
    }

    #[tokio::test]
    async fn taking_another_username_is_rejected() {
        let state = get_test_state();
        insert_user(&state, "sari");
        let user = insert_user(&state, "budi");

        let response = edit_user_endpoint(
            State(state.clone()),
            Path(user.id.as_i64()),
            Form(form("sari", None)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn updating_missing_user_is_not_found() {
        let response =
            edit_user_endpoint(State(get_test_state()), Path(7), Form(form("budi", None))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
