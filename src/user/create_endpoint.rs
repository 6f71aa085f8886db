//! Defines the endpoint for creating a new user.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use time::OffsetDateTime;

use crate::{
    Error, endpoints,
    timezone::get_local_offset,
    user::{
        UserState,
        core::{NewUser, create_user},
        form::UserForm,
    },
};

/// A route handler for creating a new user, redirects to the users view on success.
pub async fn create_user_endpoint(
    State(state): State<UserState>,
    Form(form): Form<UserForm>,
) -> Response {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let changes = match form.validate_new(state.password_cost) {
        Ok(changes) => changes,
        Err(error) => return error.into_alert_response(),
    };

    let Some(password_hash) = changes.password_hash else {
        return Error::MissingRequiredField("Password".to_owned()).into_alert_response();
    };

    let new_user = NewUser {
        full_name: changes.full_name,
        username: changes.username,
        email: changes.email,
        phone_number: changes.phone_number,
        role: changes.role,
        password_hash,
        created_at: OffsetDateTime::now_utc().to_offset(local_offset),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_user(new_user, &connection) {
        Ok(user) => {
            tracing::info!("Created user {} with role {}", user.username, user.role.key());

            (
                HxRedirect(endpoints::USERS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ Error::DuplicateUsername(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("could not create user: {error}");
            error.into_alert_response()
        }
    }
}
